//! Constrained generation with a single unconstrained fallback.
//!
//! The driver appends the schema's instruction suffix, asks the backend for a
//! constrained result, and verifies that result against the schema. On any
//! backend failure — including a result that does not conform to the schema
//! it was generated under — it retries exactly once with the backend's
//! unconstrained capability on the same prompt, returning raw text so the
//! extractor runs its text heuristics. That is the only retry in the system;
//! a second failure is fatal for the scenario alone.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use thiserror::Error;

use arbiter_core::{RawResult, Schema};

use crate::backend::{BackendError, GenerationBackend};
use crate::prompts::with_suffix;

/// Errors from the generation driver.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation failed after unconstrained fallback: {0}")]
    FallbackFailed(#[source] BackendError),
}

/// Counters for generation outcomes across a run.
#[derive(Debug, Default)]
pub struct GenerationStats {
    constrained: AtomicU32,
    fallbacks: AtomicU32,
    failures: AtomicU32,
}

/// Point-in-time view of [`GenerationStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Constrained calls that produced a conforming structured result
    pub constrained: u32,

    /// Calls that fell back to unconstrained generation
    pub fallbacks: u32,

    /// Calls where the fallback also failed
    pub failures: u32,
}

impl GenerationStats {
    /// Snapshot the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            constrained: self.constrained.load(Ordering::SeqCst),
            fallbacks: self.fallbacks.load(Ordering::SeqCst),
            failures: self.failures.load(Ordering::SeqCst),
        }
    }

    /// Reset the counters.
    pub fn reset(&self) {
        self.constrained.store(0, Ordering::SeqCst);
        self.fallbacks.store(0, Ordering::SeqCst);
        self.failures.store(0, Ordering::SeqCst);
    }
}

/// Drives a generation backend under a schema constraint.
pub struct GenerationDriver {
    backend: Arc<dyn GenerationBackend>,
    stats: GenerationStats,
}

impl GenerationDriver {
    /// Create a driver over a backend.
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            stats: GenerationStats::default(),
        }
    }

    /// Generate an answer for a prompt under a schema.
    pub async fn generate(
        &self,
        prompt: &str,
        schema: &Schema,
    ) -> Result<RawResult, GenerationError> {
        let full_prompt = with_suffix(prompt, schema);

        match self.backend.generate_constrained(&full_prompt, schema).await {
            Ok(answer) => match schema.validate_answer(&answer) {
                Ok(()) => {
                    self.stats.constrained.fetch_add(1, Ordering::SeqCst);
                    Ok(RawResult::Structured(answer))
                }
                Err(errors) => {
                    tracing::warn!(
                        backend = self.backend.name(),
                        schema = schema.name(),
                        errors = ?errors,
                        "Structured result does not conform to its schema, \
                         falling back to unconstrained generation"
                    );
                    self.fallback(&full_prompt).await
                }
            },
            Err(e) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    schema = schema.name(),
                    error = %e,
                    "Constrained generation failed, falling back to unconstrained generation"
                );
                self.fallback(&full_prompt).await
            }
        }
    }

    /// The single unconstrained retry. Not retried again on failure.
    async fn fallback(&self, full_prompt: &str) -> Result<RawResult, GenerationError> {
        match self.backend.generate_unconstrained(full_prompt).await {
            Ok(text) => {
                self.stats.fallbacks.fetch_add(1, Ordering::SeqCst);
                Ok(RawResult::Text(text))
            }
            Err(e) => {
                self.stats.failures.fetch_add(1, Ordering::SeqCst);
                Err(GenerationError::FallbackFailed(e))
            }
        }
    }

    /// Generation counters so far.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// The backend's name, for diagnostics.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::StructuredAnswer;
    use async_trait::async_trait;

    /// Backend that always returns a fixed structured answer.
    struct StructuredBackend(StructuredAnswer);

    #[async_trait]
    impl GenerationBackend for StructuredBackend {
        async fn generate_constrained(
            &self,
            _prompt: &str,
            _schema: &Schema,
        ) -> Result<StructuredAnswer, BackendError> {
            Ok(self.0.clone())
        }

        async fn generate_unconstrained(&self, _prompt: &str) -> Result<String, BackendError> {
            Ok("unconstrained text".to_string())
        }

        fn name(&self) -> &str {
            "structured-mock"
        }
    }

    /// Backend whose constrained path always fails.
    struct FlakyBackend {
        unconstrained_works: bool,
    }

    #[async_trait]
    impl GenerationBackend for FlakyBackend {
        async fn generate_constrained(
            &self,
            _prompt: &str,
            _schema: &Schema,
        ) -> Result<StructuredAnswer, BackendError> {
            Err(BackendError::ConstraintUnsatisfied("cannot satisfy".to_string()))
        }

        async fn generate_unconstrained(&self, _prompt: &str) -> Result<String, BackendError> {
            if self.unconstrained_works {
                Ok("yes".to_string())
            } else {
                Err(BackendError::Backend("model crashed".to_string()))
            }
        }

        fn name(&self) -> &str {
            "flaky-mock"
        }
    }

    #[tokio::test]
    async fn test_constrained_path() {
        let backend = Arc::new(StructuredBackend(StructuredAnswer::Boolean { answer: true }));
        let driver = GenerationDriver::new(backend);

        let result = driver
            .generate("Is Serra Angel a creature?", &Schema::Boolean)
            .await
            .unwrap();

        assert_eq!(
            result,
            RawResult::Structured(StructuredAnswer::Boolean { answer: true })
        );
        assert_eq!(driver.stats().constrained, 1);
        assert_eq!(driver.stats().fallbacks, 0);
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back_to_text() {
        let backend = Arc::new(FlakyBackend {
            unconstrained_works: true,
        });
        let driver = GenerationDriver::new(backend);

        let result = driver
            .generate("Is Serra Angel a creature?", &Schema::Boolean)
            .await
            .unwrap();

        assert_eq!(result, RawResult::Text("yes".to_string()));
        assert_eq!(driver.stats().fallbacks, 1);
    }

    #[tokio::test]
    async fn test_double_failure_is_fatal() {
        let backend = Arc::new(FlakyBackend {
            unconstrained_works: false,
        });
        let driver = GenerationDriver::new(backend);

        let result = driver.generate("prompt", &Schema::Boolean).await;
        assert!(matches!(result, Err(GenerationError::FallbackFailed(_))));
        assert_eq!(driver.stats().failures, 1);
    }

    #[tokio::test]
    async fn test_nonconforming_result_falls_back() {
        // Backend answers with the wrong variant for the schema.
        let backend = Arc::new(StructuredBackend(StructuredAnswer::Phase {
            phase: "upkeep".to_string(),
        }));
        let driver = GenerationDriver::new(backend);

        let result = driver.generate("prompt", &Schema::Boolean).await.unwrap();
        assert_eq!(result, RawResult::Text("unconstrained text".to_string()));
        assert_eq!(driver.stats().constrained, 0);
        assert_eq!(driver.stats().fallbacks, 1);
    }

    #[tokio::test]
    async fn test_out_of_enum_result_falls_back() {
        let backend = Arc::new(StructuredBackend(StructuredAnswer::CardSelection {
            selected_card: "Black Lotus".to_string(),
        }));
        let driver = GenerationDriver::new(backend);

        let schema = Schema::card_selection(vec!["Millstone".to_string()]).unwrap();
        let result = driver.generate("prompt", &schema).await.unwrap();
        assert!(matches!(result, RawResult::Text(_)));
    }
}
