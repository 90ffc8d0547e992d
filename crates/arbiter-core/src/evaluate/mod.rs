//! Comparison strategies.
//!
//! An evaluator turns (normalized output, expected output) into pass/fail.
//! Strategies are registered by name; a scenario that names an unknown
//! strategy degrades to `exact` rather than aborting the run. All strategies
//! trim whitespace and fold case on both sides before comparing.
//!
//! Independently of the chosen strategy, a continuous similarity ratio is
//! computed for every scenario as a diagnostic.

use std::collections::BTreeMap;
use std::sync::Arc;

mod similarity;

pub use similarity::similarity_ratio;

use crate::extract::{boolean_token, first_integer};

/// Pass threshold for the `semantic` strategy. Strictly greater-than.
const SEMANTIC_THRESHOLD: f64 = 0.80;

/// A named comparison strategy.
pub trait Evaluator: Send + Sync {
    /// The strategy's registry name.
    fn name(&self) -> &'static str;

    /// Whether the output passes against the expected answer.
    fn evaluate(&self, output: &str, expected: &str) -> bool;
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// String equality after normalization.
pub struct ExactEvaluator;

impl Evaluator for ExactEvaluator {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn evaluate(&self, output: &str, expected: &str) -> bool {
        normalize(output) == normalize(expected)
    }
}

/// Expected answer appears as a substring of the output.
pub struct ContainsEvaluator;

impl Evaluator for ContainsEvaluator {
    fn name(&self) -> &'static str {
        "contains"
    }

    fn evaluate(&self, output: &str, expected: &str) -> bool {
        normalize(output).contains(&normalize(expected))
    }
}

/// Sequence similarity above a fixed threshold.
pub struct SemanticEvaluator;

impl Evaluator for SemanticEvaluator {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn evaluate(&self, output: &str, expected: &str) -> bool {
        similarity_ratio(output, expected) > SEMANTIC_THRESHOLD
    }
}

/// First integer on each side must match. No integer on either side fails.
pub struct NumericEvaluator;

impl Evaluator for NumericEvaluator {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn evaluate(&self, output: &str, expected: &str) -> bool {
        match (first_integer(output), first_integer(expected)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Boolean comparison over the fixed yes/no vocabulary.
///
/// Each side maps independently to a tri-state; if either side is unmapped,
/// the comparison degrades to plain string equality.
pub struct BooleanEvaluator;

impl Evaluator for BooleanEvaluator {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn evaluate(&self, output: &str, expected: &str) -> bool {
        match (boolean_token(output), boolean_token(expected)) {
            (Some(a), Some(b)) => a == b,
            _ => normalize(output) == normalize(expected),
        }
    }
}

/// Registry of comparison strategies.
pub struct EvaluatorRegistry {
    strategies: BTreeMap<&'static str, Arc<dyn Evaluator>>,
    fallback: Arc<dyn Evaluator>,
}

impl EvaluatorRegistry {
    /// Create a registry with all built-in strategies.
    pub fn with_defaults() -> Self {
        let mut strategies: BTreeMap<&'static str, Arc<dyn Evaluator>> = BTreeMap::new();
        let defaults: [Arc<dyn Evaluator>; 5] = [
            Arc::new(ExactEvaluator),
            Arc::new(ContainsEvaluator),
            Arc::new(SemanticEvaluator),
            Arc::new(NumericEvaluator),
            Arc::new(BooleanEvaluator),
        ];
        for strategy in defaults {
            strategies.insert(strategy.name(), strategy);
        }

        Self {
            strategies,
            fallback: Arc::new(ExactEvaluator),
        }
    }

    /// Resolve a strategy by name.
    ///
    /// Unknown names resolve to `exact` so a misconfigured scenario degrades
    /// instead of aborting the run.
    pub fn get(&self, name: &str) -> &dyn Evaluator {
        match self.strategies.get(name.trim()) {
            Some(strategy) => strategy.as_ref(),
            None => {
                tracing::warn!(strategy = name, "Unknown evaluator, defaulting to exact");
                self.fallback.as_ref()
            }
        }
    }

    /// Registered strategy names.
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.keys().copied().collect()
    }
}

impl Default for EvaluatorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Outcome of grading one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    /// Id of the graded scenario
    pub scenario_id: String,

    /// The canonical answer string that was graded
    pub normalized_output: String,

    /// Whether the chosen strategy passed the answer
    pub passed: bool,

    /// Diagnostic similarity ratio in [0, 1]
    pub similarity: f64,

    /// Why the scenario failed before grading, if it did
    pub error: Option<String>,
}

impl EvaluationResult {
    /// A result for a scenario that failed before its answer could be graded.
    pub fn failed(scenario_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            normalized_output: String::new(),
            passed: false,
            similarity: 0.0,
            error: Some(error.into()),
        }
    }
}
