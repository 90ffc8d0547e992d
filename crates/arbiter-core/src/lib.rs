//! # arbiter-core
//!
//! Deterministic answer-contract pipeline for grading language-model answers
//! to quiz scenarios.
//!
//! The pipeline infers what shape of answer a scenario expects, derives a
//! machine-checkable schema for that shape, normalizes whatever a generation
//! backend returned into one canonical answer string, and grades it against
//! the expected output with a pluggable comparison strategy.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: classification, schema construction, extraction, and
//!    evaluation are pure functions of their inputs
//! 2. **No model calls**: driving a generation backend lives in
//!    `arbiter-runtime`; this crate never blocks
//! 3. **Scenario-scoped failures**: one scenario's configuration error never
//!    poisons another's result
//! 4. **Parallel-safe**: everything here is `Send + Sync` values with no
//!    shared mutable state
//!
//! ## Example
//!
//! ```rust,ignore
//! use arbiter_core::{classify, evaluate_answer, resolve_schema};
//! use arbiter_core::{EvaluatorRegistry, RawResult, Scenario, SchemaRegistry};
//!
//! let schemas = SchemaRegistry::new();
//! let evaluators = EvaluatorRegistry::with_defaults();
//!
//! let scenario = Scenario::from_yaml_file("scenarios/draft/p1p1.yaml")?;
//! let classification = classify(&scenario);
//! let schema = resolve_schema(&schemas, &classification)?;
//!
//! // ... hand `schema` to a generation backend, get a RawResult back ...
//! let result = evaluate_answer(&evaluators, &scenario, &schema, &raw);
//! println!("{}: {}", result.scenario_id, if result.passed { "PASS" } else { "FAIL" });
//! ```

pub mod answer;
pub mod classify;
pub mod evaluate;
pub mod extract;
pub mod scenario;
pub mod schema;

// Re-export main types at crate root
pub use answer::{RawResult, StructuredAnswer};
pub use classify::{classify, extract_options, Classification};
pub use evaluate::{
    similarity_ratio, EvaluationResult, Evaluator, EvaluatorRegistry,
};
pub use extract::extract;
pub use scenario::{load_dir, yaml_files, Scenario, ScenarioError};
pub use schema::{Schema, SchemaError, SchemaParams, SchemaRegistry};

/// Turn a classification into a concrete schema.
///
/// Empty parameters resolve through the static catalogue, recovering unknown
/// names to [`Schema::Simple`] with a warning. Parametrized classifications
/// go through the factory; a missing or unsatisfiable parameter is a
/// configuration error the caller records against that scenario.
pub fn resolve_schema(
    registry: &SchemaRegistry,
    classification: &Classification,
) -> Result<Schema, SchemaError> {
    if classification.params.is_empty() {
        match registry.lookup(&classification.schema_name) {
            Ok(schema) => Ok(schema),
            Err(SchemaError::Unknown(name)) => {
                tracing::warn!(schema = %name, "Unknown schema, falling back to simple");
                Ok(Schema::Simple)
            }
            Err(e) => Err(e),
        }
    } else {
        registry.build(&classification.schema_name, &classification.params)
    }
}

/// Grade a backend result against a scenario's expected output.
///
/// The similarity ratio is computed for every scenario regardless of the
/// strategy, as a diagnostic.
pub fn evaluate_answer(
    evaluators: &EvaluatorRegistry,
    scenario: &Scenario,
    schema: &Schema,
    raw: &RawResult,
) -> EvaluationResult {
    let normalized = extract(raw, schema);
    let strategy = evaluators.get(&scenario.evaluator);
    let passed = strategy.evaluate(&normalized, &scenario.expected_output);
    let similarity = similarity_ratio(&normalized, &scenario.expected_output);

    EvaluationResult {
        scenario_id: scenario.id.clone(),
        normalized_output: normalized,
        passed,
        similarity,
        error: None,
    }
}
