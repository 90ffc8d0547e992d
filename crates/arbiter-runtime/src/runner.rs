//! Batched evaluation runs.
//!
//! A run takes an ordered collection of scenarios through the full pipeline:
//! classify, resolve the schema, drive generation, extract, evaluate.
//! Generation calls are batched up to the configured width; results come out
//! in input scenario order regardless of which calls finish first.
//!
//! Every failure is scenario-scoped. A configuration error, a generation
//! failure, or a timeout records a failed result for that scenario and the
//! run moves on. A scenario only enters the aggregate counters once its full
//! extract+evaluate step has completed, so an aborted run (dropping the
//! future cancels the in-flight backend calls with it) never counts
//! half-finished work.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt};

use arbiter_core::{
    classify, evaluate_answer, resolve_schema, EvaluationResult, EvaluatorRegistry, Scenario,
    SchemaRegistry,
};

use crate::backend::GenerationBackend;
use crate::config::RunConfig;
use crate::driver::GenerationDriver;
use crate::report::RunReport;

/// Runs scenario batches against a generation backend.
pub struct Runner {
    driver: GenerationDriver,
    schemas: SchemaRegistry,
    evaluators: EvaluatorRegistry,
    config: RunConfig,
}

impl Runner {
    /// Create a runner with the default configuration.
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self::with_config(backend, RunConfig::default())
    }

    /// Create a runner with an explicit configuration.
    pub fn with_config(backend: Arc<dyn GenerationBackend>, config: RunConfig) -> Self {
        Self {
            driver: GenerationDriver::new(backend),
            schemas: SchemaRegistry::new(),
            evaluators: EvaluatorRegistry::with_defaults(),
            config,
        }
    }

    /// Evaluate all scenarios and aggregate a report.
    pub async fn run(&self, scenarios: &[Scenario]) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();

        tracing::info!(
            total = scenarios.len(),
            batch_width = self.config.batch_width,
            backend = self.driver.backend_name(),
            "Starting evaluation run"
        );

        let results: Vec<EvaluationResult> = stream::iter(scenarios)
            .map(|scenario| self.run_one(scenario))
            .buffered(self.config.batch_width)
            .collect()
            .await;

        let report = RunReport::new(results, started_at, start.elapsed(), self.driver.stats());

        tracing::info!(
            passed = report.passed,
            failed = report.failed,
            pass_rate = report.pass_rate(),
            "Run complete"
        );

        report
    }

    /// Take one scenario through the full pipeline.
    async fn run_one(&self, scenario: &Scenario) -> EvaluationResult {
        let classification = classify(scenario);

        let schema = match resolve_schema(&self.schemas, &classification) {
            Ok(schema) => schema,
            Err(e) => {
                tracing::warn!(scenario = %scenario.id, error = %e, "Schema resolution failed");
                return EvaluationResult::failed(&scenario.id, e.to_string());
            }
        };

        let generated = tokio::time::timeout(
            self.config.generation_timeout,
            self.driver.generate(&scenario.prompt, &schema),
        )
        .await;

        let raw = match generated {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                tracing::warn!(scenario = %scenario.id, error = %e, "Generation failed");
                return EvaluationResult::failed(&scenario.id, e.to_string());
            }
            Err(_) => {
                tracing::warn!(
                    scenario = %scenario.id,
                    timeout = ?self.config.generation_timeout,
                    "Generation timed out"
                );
                return EvaluationResult::failed(
                    &scenario.id,
                    format!(
                        "Generation timed out after {:?}",
                        self.config.generation_timeout
                    ),
                );
            }
        };

        evaluate_answer(&self.evaluators, scenario, &schema, &raw)
    }
}
