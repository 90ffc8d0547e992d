//! Run configuration.

use std::time::Duration;

/// Configuration for a batched evaluation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// How many generation calls may be in flight at once
    pub batch_width: usize,

    /// Per-scenario generation timeout
    pub generation_timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_width: 4,
            generation_timeout: Duration::from_secs(30),
        }
    }
}

impl RunConfig {
    /// Set the batch width. Zero is clamped to one.
    pub fn with_batch_width(mut self, width: usize) -> Self {
        self.batch_width = width.max(1);
        self
    }

    /// Set the per-scenario generation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }
}
