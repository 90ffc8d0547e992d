//! Run report aggregation and printing.

use chrono::{DateTime, Utc};
use std::time::Duration;

use arbiter_core::EvaluationResult;

use crate::driver::StatsSnapshot;

/// The outcome of one evaluation run.
#[derive(Debug)]
pub struct RunReport {
    /// Per-scenario results, in input scenario order
    pub results: Vec<EvaluationResult>,

    /// Total scenarios evaluated
    pub total: usize,

    /// Scenarios that passed
    pub passed: usize,

    /// Scenarios that failed (grading or any scenario-scoped error)
    pub failed: usize,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Generation counters from the driver
    pub generation: StatsSnapshot,
}

impl RunReport {
    /// Build a report from ordered results.
    pub fn new(
        results: Vec<EvaluationResult>,
        started_at: DateTime<Utc>,
        duration: Duration,
        generation: StatsSnapshot,
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;

        Self {
            results,
            total,
            passed,
            failed,
            started_at,
            duration,
            generation,
        }
    }

    /// Pass rate as a percentage.
    pub fn pass_rate(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f32 / self.total as f32) * 100.0
        }
    }

    /// The run-level exit status: success only if every scenario passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Print a human-readable summary.
    pub fn print_summary(&self) {
        println!("\n========== EVALUATION REPORT ==========\n");
        println!("Started:  {}", self.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("Duration: {:.1}s", self.duration.as_secs_f64());
        println!(
            "Scenarios: {}/{} passed ({:.1}%)",
            self.passed,
            self.total,
            self.pass_rate()
        );
        println!(
            "Generation: {} constrained, {} fallbacks, {} failures",
            self.generation.constrained, self.generation.fallbacks, self.generation.failures
        );

        let failed: Vec<&EvaluationResult> = self.results.iter().filter(|r| !r.passed).collect();
        if !failed.is_empty() {
            println!("\n---------- Failed Scenarios ----------\n");
            for result in failed {
                println!("[FAIL] {}", result.scenario_id);
                if let Some(error) = &result.error {
                    println!("  Error: {}", error);
                } else {
                    println!("  Output: \"{}\"", result.normalized_output);
                    println!("  Similarity: {:.2}", result.similarity);
                }
            }
        }
        println!("\n========================================\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, passed: bool) -> EvaluationResult {
        EvaluationResult {
            scenario_id: id.to_string(),
            normalized_output: "yes".to_string(),
            passed,
            similarity: if passed { 1.0 } else { 0.2 },
            error: None,
        }
    }

    fn snapshot() -> StatsSnapshot {
        StatsSnapshot {
            constrained: 2,
            fallbacks: 1,
            failures: 0,
        }
    }

    #[test]
    fn test_aggregation() {
        let report = RunReport::new(
            vec![result("a", true), result("b", false), result("c", true)],
            Utc::now(),
            Duration::from_secs(2),
            snapshot(),
        );

        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.all_passed());
        assert!((report.pass_rate() - 66.6).abs() < 0.1);
    }

    #[test]
    fn test_empty_run() {
        let report = RunReport::new(Vec::new(), Utc::now(), Duration::ZERO, snapshot());
        assert_eq!(report.pass_rate(), 0.0);
        assert!(report.all_passed());
    }
}
