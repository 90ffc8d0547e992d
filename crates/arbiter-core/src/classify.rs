//! Scenario classification.
//!
//! Classification inspects a scenario's declared or inferred properties and
//! selects the schema name plus the parameters needed to instantiate it. It
//! is a pure function of the scenario: no side effects, same result on every
//! call.
//!
//! The decision table is ordered; the first matching rule wins.

use lazy_static::lazy_static;
use regex::Regex;

use crate::scenario::Scenario;
use crate::schema::SchemaParams;

lazy_static! {
    /// Marker phrase introducing a finite option list in a prompt, capturing
    /// the comma-separated list up to the end of the sentence.
    static ref OPTIONS_PATTERN: Regex = Regex::new(
        r"(?i)(?:between|from|choice between|choice of|options:?)\s+([^.?]+)"
    ).unwrap();

    /// Separator between options: a comma, optionally followed by "and".
    static ref OPTION_SPLIT_PATTERN: Regex = Regex::new(r",\s*(?:and\s+)?").unwrap();

    /// First unsigned integer in a string.
    static ref UNSIGNED_INT_PATTERN: Regex = Regex::new(r"\d+").unwrap();
}

/// Expected outputs treated as boolean answers.
const BOOLEAN_VOCAB: &[&str] = &["yes", "no", "true", "false", "y", "n"];

/// The schema name and parameters selected for a scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Registry name of the selected schema
    pub schema_name: String,

    /// Parameters for dynamic instantiation; empty for static schemas
    pub params: SchemaParams,
}

impl Classification {
    fn fixed(name: &str) -> Self {
        Self {
            schema_name: name.to_string(),
            params: SchemaParams::default(),
        }
    }

    fn with_params(name: &str, params: SchemaParams) -> Self {
        Self {
            schema_name: name.to_string(),
            params,
        }
    }
}

/// Select a schema for a scenario.
pub fn classify(scenario: &Scenario) -> Classification {
    // 1. An explicit output_type wins outright.
    if let Some(output_type) = scenario.output_type.as_deref() {
        return classify_declared(scenario, output_type);
    }

    // 2. Draft pick decisions become a card selection when the prompt lists
    //    the candidates.
    if scenario.category == "draft" && scenario.subcategory == "pick_decision" {
        let options = extract_options(&scenario.prompt);
        if !options.is_empty() {
            return Classification::with_params(
                "card_selection",
                SchemaParams::with_options(options),
            );
        }
    }

    // 3. Combat math gets a range wide enough to absorb overshoot without
    //    admitting unbounded answers.
    if scenario.category == "combat" && scenario.subcategory == "combat_math" {
        if let Some(n) = first_unsigned_int(&scenario.expected_output) {
            return Classification::with_params(
                "numeric_range",
                SchemaParams::with_bounds(0, n.saturating_add(10).max(20)),
            );
        }
    }

    let expected = scenario.expected_output.trim();

    // 4. Boolean vocabulary.
    let expected_lower = expected.to_lowercase();
    if BOOLEAN_VOCAB.contains(&expected_lower.as_str()) {
        return Classification::fixed("boolean");
    }

    // 5. Bare signed integer.
    if expected.parse::<i64>().is_ok() {
        return Classification::fixed("numeric");
    }

    // 6. Rules categories with a dedicated vocabulary.
    if scenario.category == "rules" {
        if scenario.subcategory == "card_types" && scenario.prompt.to_lowercase().contains("type")
        {
            return Classification::fixed("card_type");
        }
        if scenario.subcategory.contains("phase") {
            return Classification::fixed("phase");
        }
        if scenario.subcategory == "mana_costs" {
            return Classification::fixed("mana_cost");
        }
    }

    // 7. Short answers stay simple; anything longer is an explanation.
    if expected.len() <= 20 {
        Classification::fixed("simple")
    } else {
        Classification::fixed("explanation")
    }
}

/// Classify a scenario whose output type is declared.
fn classify_declared(scenario: &Scenario, output_type: &str) -> Classification {
    match output_type {
        "card_selection" => {
            let options = extract_options(&scenario.prompt);
            if options.is_empty() {
                // No extractable options: degrade to the registry's
                // unconstrained entry.
                Classification::fixed("card_selection")
            } else {
                Classification::with_params(
                    "card_selection",
                    SchemaParams::with_options(options),
                )
            }
        }
        "multiple_choice" => match &scenario.choices {
            Some(choices) => Classification::with_params(
                "multiple_choice",
                SchemaParams::with_choices(choices.clone()),
            ),
            None => Classification::fixed("multiple_choice"),
        },
        "numeric_range" => match (scenario.min_val, scenario.max_val) {
            (Some(min), Some(max)) => Classification::with_params(
                "numeric_range",
                SchemaParams::with_bounds(min, max),
            ),
            _ => Classification::fixed("numeric_range"),
        },
        other => Classification::fixed(other),
    }
}

/// Extract a finite option list from a prompt.
///
/// Searches for a marker phrase ("between", "from", "choice between",
/// "choice of", "options:") followed by a comma-separated list, optionally
/// with a trailing "and". Tokens are trimmed of whitespace and surrounding
/// quotes; empty tokens are dropped. No match yields an empty list.
pub fn extract_options(prompt: &str) -> Vec<String> {
    let Some(captures) = OPTIONS_PATTERN.captures(prompt) else {
        return Vec::new();
    };

    let list = &captures[1];
    OPTION_SPLIT_PATTERN
        .split(list)
        .map(|token| {
            let token = token.trim();
            token
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .or_else(|| token.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')))
                .unwrap_or(token)
                .trim()
                .to_string()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

fn first_unsigned_int(text: &str) -> Option<i64> {
    UNSIGNED_INT_PATTERN
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}
