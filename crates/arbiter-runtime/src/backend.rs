//! Generation backend abstraction.
//!
//! The backend is the external collaborator that turns a prompt plus a
//! schema constraint into an answer. Everything about how that happens —
//! model choice, batching, hardware placement — is the backend's concern;
//! the runtime depends only on the two operations below.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use arbiter_core::{Schema, StructuredAnswer};

/// Errors reported by a generation backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend could not satisfy the constraint: {0}")]
    ConstraintUnsatisfied(String),

    #[error("Backend timeout after {0:?}")]
    Timeout(Duration),

    #[error("Malformed backend result: {0}")]
    Malformed(String),

    #[error("Backend failure: {0}")]
    Backend(String),
}

/// A generation backend.
///
/// Implementations may render the schema with [`Schema::to_json_schema`] to
/// obtain a grammar for constrained decoding. A structured result must be
/// tagged with the variant matching the schema it was generated under; the
/// driver verifies conformance and treats violations as backend failures.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate an answer guaranteed to satisfy the schema.
    async fn generate_constrained(
        &self,
        prompt: &str,
        schema: &Schema,
    ) -> Result<StructuredAnswer, BackendError>;

    /// Generate free text with no constraint.
    async fn generate_unconstrained(&self, prompt: &str) -> Result<String, BackendError>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}
