//! # arbiter-runtime
//!
//! Generation driving and batched evaluation runs for arbiter.
//!
//! `arbiter-core` is fully deterministic and never calls a model. This crate
//! owns everything that does: the [`GenerationBackend`] trait the external
//! backend implements, the [`GenerationDriver`] that asks it for constrained
//! answers with a single documented fallback to unconstrained text, and the
//! [`Runner`] that takes a scenario batch through the whole pipeline under a
//! bounded concurrency width.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use arbiter_runtime::{RunConfig, Runner};
//!
//! let backend = Arc::new(MyBackend::load("some-model")?);
//! let runner = Runner::with_config(backend, RunConfig::default().with_batch_width(8));
//!
//! let scenarios = arbiter_core::load_dir("scenarios".as_ref())?;
//! let report = runner.run(&scenarios).await;
//! report.print_summary();
//!
//! std::process::exit(if report.all_passed() { 0 } else { 1 });
//! ```

pub mod backend;
pub mod config;
pub mod driver;
pub mod prompts;
pub mod report;
pub mod runner;

// Re-export main types at crate root
pub use backend::{BackendError, GenerationBackend};
pub use config::RunConfig;
pub use driver::{GenerationDriver, GenerationError, GenerationStats, StatsSnapshot};
pub use prompts::{instruction_suffix, with_suffix};
pub use report::RunReport;
pub use runner::Runner;
