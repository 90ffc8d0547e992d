//! Scenario parsing from YAML.
//!
//! A scenario is one quiz item: a prompt, the expected answer, the grading
//! strategy, and optional classification hints. Scenario files are plain YAML
//! documents, one scenario per file, collected recursively from a directory
//! tree.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading scenarios.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Duplicate scenario id: {0}")]
    DuplicateId(String),
}

/// One quiz item.
///
/// `output_type`, `choices`, `min_val`, and `max_val` are optional hints the
/// classifier consumes; everything else is required for grading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique identifier within a run
    pub id: String,

    /// The question posed to the model
    pub prompt: String,

    /// The answer the model is graded against
    pub expected_output: String,

    /// Name of the comparison strategy (e.g. "exact", "semantic")
    pub evaluator: String,

    /// Free-form classification tag (e.g. "draft", "combat", "rules")
    #[serde(default)]
    pub category: String,

    /// Free-form sub-tag (e.g. "pick_decision", "combat_math")
    #[serde(default)]
    pub subcategory: String,

    /// Explicit schema name, overriding inference
    #[serde(default)]
    pub output_type: Option<String>,

    /// Declared choices for multiple_choice scenarios
    #[serde(default)]
    pub choices: Option<Vec<String>>,

    /// Declared lower bound for numeric_range scenarios
    #[serde(default)]
    pub min_val: Option<i64>,

    /// Declared upper bound for numeric_range scenarios
    #[serde(default)]
    pub max_val: Option<i64>,
}

impl Scenario {
    /// Parse a scenario from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse a scenario from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Validate the scenario structure.
    fn validate(&self) -> Result<(), ScenarioError> {
        if self.id.is_empty() {
            return Err(ScenarioError::MissingField("id".to_string()));
        }
        if self.prompt.is_empty() {
            return Err(ScenarioError::MissingField("prompt".to_string()));
        }
        if self.expected_output.is_empty() {
            return Err(ScenarioError::MissingField("expected_output".to_string()));
        }
        if self.evaluator.is_empty() {
            return Err(ScenarioError::MissingField("evaluator".to_string()));
        }
        Ok(())
    }
}

/// Load all scenarios under a directory tree.
///
/// Walks the tree recursively, parsing every `*.yaml`/`*.yml` file. Files are
/// visited in sorted path order so a corpus always loads in the same order.
/// Files that fail to parse are skipped with a warning; duplicate ids across
/// the corpus are an error.
pub fn load_dir(dir: &Path) -> Result<Vec<Scenario>, ScenarioError> {
    let paths = yaml_files(dir)?;

    let mut scenarios = Vec::new();
    let mut seen = HashSet::new();

    for path in paths {
        match Scenario::from_yaml_file(&path) {
            Ok(scenario) => {
                if !seen.insert(scenario.id.clone()) {
                    return Err(ScenarioError::DuplicateId(scenario.id));
                }
                scenarios.push(scenario);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping scenario file");
            }
        }
    }

    Ok(scenarios)
}

/// All `*.yaml`/`*.yml` files under a directory tree, in sorted path order.
pub fn yaml_files(dir: &Path) -> Result<Vec<PathBuf>, ScenarioError> {
    let mut paths = Vec::new();
    collect_yaml_files(dir, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_yaml_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ScenarioError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_yaml_files(&path, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml")
        {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_SCENARIO: &str = r#"
id: "draft_001"
prompt: "Choose the best card from Millstone, Serra Angel, and Llanowar Elves"
expected_output: "Serra Angel"
evaluator: "exact"
category: "draft"
subcategory: "pick_decision"
"#;

    #[test]
    fn test_parse_valid_scenario() {
        let scenario = Scenario::from_yaml(VALID_SCENARIO).unwrap();
        assert_eq!(scenario.id, "draft_001");
        assert_eq!(scenario.category, "draft");
        assert_eq!(scenario.subcategory, "pick_decision");
        assert!(scenario.output_type.is_none());
    }

    #[test]
    fn test_parse_with_hints() {
        let yaml = r#"
id: "rules_042"
prompt: "What color is Llanowar Elves?"
expected_output: "Green"
evaluator: "exact"
output_type: "multiple_choice"
choices: ["Red", "Blue", "Green"]
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(scenario.output_type.as_deref(), Some("multiple_choice"));
        assert_eq!(scenario.choices.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_expected_output() {
        let yaml = r#"
id: "x"
prompt: "Is Serra Angel a creature?"
expected_output: ""
evaluator: "boolean"
"#;
        let result = Scenario::from_yaml(yaml);
        assert!(matches!(result, Err(ScenarioError::MissingField(f)) if f == "expected_output"));
    }

    #[test]
    fn test_missing_evaluator_field() {
        let yaml = r#"
id: "x"
prompt: "Is Serra Angel a creature?"
expected_output: "yes"
"#;
        // serde requires evaluator; the parse itself fails
        assert!(Scenario::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_load_dir_rejects_duplicate_ids() {
        let dir = std::env::temp_dir().join(format!("arbiter-scenarios-{}", std::process::id()));
        let sub = dir.join("draft");
        fs::create_dir_all(&sub).unwrap();
        fs::write(dir.join("a.yaml"), VALID_SCENARIO).unwrap();
        fs::write(sub.join("b.yaml"), VALID_SCENARIO).unwrap();

        let result = load_dir(&dir);
        fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(result, Err(ScenarioError::DuplicateId(id)) if id == "draft_001"));
    }

    #[test]
    fn test_load_dir_sorted_and_recursive() {
        let dir = std::env::temp_dir().join(format!("arbiter-scenarios-ord-{}", std::process::id()));
        let sub = dir.join("combat");
        fs::create_dir_all(&sub).unwrap();
        fs::write(
            dir.join("z.yaml"),
            VALID_SCENARIO.replace("draft_001", "z_scenario"),
        )
        .unwrap();
        fs::write(
            sub.join("a.yaml"),
            VALID_SCENARIO.replace("draft_001", "a_scenario"),
        )
        .unwrap();

        let scenarios = load_dir(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        let ids: Vec<&str> = scenarios.iter().map(|s| s.id.as_str()).collect();
        // combat/a.yaml sorts before z.yaml
        assert_eq!(ids, vec!["a_scenario", "z_scenario"]);
    }
}
