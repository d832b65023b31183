//! Growth-rate timing experiments.
//!
//! An experiment times one operation at five geometrically increasing input
//! sizes, one worker thread per size, and reports the per-size average CPU
//! time together with the ratio of consecutive averages. A ratio near 2 when
//! the size doubles reads as linear growth, near 4 as quadratic; the harness
//! prints the numbers and leaves the reading to the human.
//!
//! # Execution model
//!
//! 1. The configuration is validated and the thread CPU clock probed once
//!    up front.
//! 2. Five workers start, one per size tier. Each generates a single input
//!    for its size, runs the operation `trials` times against it, and
//!    averages the per-trial CPU time. Results live in each worker's return
//!    value; no state is shared and nothing locks.
//! 3. Every worker is joined before any result is read. A worker that dies
//!    surfaces as an error only after the barrier, so no sibling is left
//!    running when `run` returns.

use std::thread;
use std::time::Duration;

use crate::clock::{self, ThreadCpuTimer};
use crate::errors::AssayError;
use crate::output::SharedOutput;

/// Fixed number of size tiers; each tier doubles the previous size.
pub const SIZE_STEPS: usize = 5;

// ============================================================================
// EXPERIMENT
// ============================================================================

/// One immutable timing-experiment configuration.
pub struct Experiment<G, O> {
    trials: u32,
    initial_size: usize,
    generate: G,
    operation: O,
}

impl<G, O> Experiment<G, O> {
    /// Validates the configuration. Zero trials or a zero initial size
    /// cannot produce a meaningful report and are rejected outright.
    pub fn new(
        trials: u32,
        initial_size: usize,
        generate: G,
        operation: O,
    ) -> Result<Self, AssayError> {
        if trials == 0 {
            return Err(AssayError::experiment_config("trial count must be positive"));
        }
        if initial_size == 0 {
            return Err(AssayError::experiment_config("initial size must be positive"));
        }
        Ok(Self {
            trials,
            initial_size,
            generate,
            operation,
        })
    }

    /// Runs every size tier on its own thread and gathers the averages.
    pub fn run<I>(&self) -> Result<ExperimentReport, AssayError>
    where
        G: Fn(usize) -> I + Sync,
        O: Fn(usize, &mut I) + Sync,
    {
        clock::probe()?;

        let outcomes: Vec<(usize, thread::Result<Result<f64, AssayError>>)> =
            thread::scope(|scope| {
                let handles: Vec<_> = (0..SIZE_STEPS)
                    .map(|step| {
                        let size = self.initial_size << step;
                        (size, scope.spawn(move || self.tier_average(size)))
                    })
                    .collect();
                // Join barrier: collect every outcome before reporting any.
                handles
                    .into_iter()
                    .map(|(size, handle)| (size, handle.join()))
                    .collect()
            });

        let mut averages = Vec::with_capacity(SIZE_STEPS);
        for (size, outcome) in outcomes {
            match outcome {
                Ok(average) => averages.push((size, average?)),
                Err(_) => return Err(AssayError::WorkerPanicked { size }),
            }
        }
        Ok(ExperimentReport::from_averages(self.trials, &averages))
    }

    // One worker: a single generated input, `trials` timed runs against it.
    fn tier_average<I>(&self, size: usize) -> Result<f64, AssayError>
    where
        G: Fn(usize) -> I,
        O: Fn(usize, &mut I),
    {
        let mut input = (self.generate)(size);
        let mut total = Duration::ZERO;
        for _ in 0..self.trials {
            let timer = ThreadCpuTimer::start()?;
            (self.operation)(size, &mut input);
            total += timer.elapsed()?;
        }
        Ok(total.as_secs_f64() * 1_000.0 / self.trials as f64)
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// One row of the timing table.
#[derive(Debug, Clone, Copy)]
pub struct SizeTiming {
    pub size: usize,
    pub average_ms: f64,
    /// Quotient of this tier's average over the previous tier's; 0 for the
    /// first tier and whenever the previous average was exactly 0.
    pub ratio: f64,
}

/// The rendered outcome of one experiment, rows in ascending size order.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub trials: u32,
    pub rows: Vec<SizeTiming>,
    pub mean_ratio: f64,
}

impl ExperimentReport {
    fn from_averages(trials: u32, averages: &[(usize, f64)]) -> Self {
        let mut rows = Vec::with_capacity(averages.len());
        let mut ratio_total = 0.0;
        for (step, &(size, average_ms)) in averages.iter().enumerate() {
            let previous = if step == 0 { 0.0 } else { averages[step - 1].1 };
            let ratio = if step == 0 || previous == 0.0 {
                0.0
            } else {
                average_ms / previous
            };
            ratio_total += ratio;
            rows.push(SizeTiming {
                size,
                average_ms,
                ratio,
            });
        }
        Self {
            trials,
            rows,
            mean_ratio: ratio_total / (SIZE_STEPS as f64 - 1.0),
        }
    }

    /// Emits the table, labeled with the owning test's name.
    pub fn render(&self, label: &str, output: &SharedOutput) {
        output.line("");
        output.line(&format!("== Timing {} ==", label));
        output.line(&format!("Repetitions: {}", self.trials));
        for row in &self.rows {
            output.line(&format!(
                "Size: {}, Time(ms): {:.6}, Ratio: {:.6}",
                row.size, row.average_ms, row.ratio
            ));
        }
        output.line(&format!("Average ratio: {:.6}", self.mean_ratio));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_divide_consecutive_averages() {
        let averages = [(10, 1.0), (20, 2.0), (40, 4.0), (80, 8.0), (160, 16.0)];
        let report = ExperimentReport::from_averages(3, &averages);
        assert_eq!(report.rows[0].ratio, 0.0);
        for row in &report.rows[1..] {
            assert_eq!(row.ratio, 2.0);
        }
        assert_eq!(report.mean_ratio, 2.0);
    }

    #[test]
    fn zero_previous_average_yields_zero_ratio() {
        let averages = [(10, 0.0), (20, 0.0), (40, 4.0), (80, 8.0), (160, 8.0)];
        let report = ExperimentReport::from_averages(1, &averages);
        assert_eq!(report.rows[1].ratio, 0.0);
        assert_eq!(report.rows[2].ratio, 0.0);
        assert_eq!(report.rows[3].ratio, 2.0);
        assert_eq!(report.rows[4].ratio, 1.0);
    }

    #[test]
    fn misconfigured_experiments_are_rejected() {
        let generate = |size: usize| vec![0u8; size];
        let operation = |_: usize, _: &mut Vec<u8>| {};
        assert!(matches!(
            Experiment::new(0, 10, generate, operation),
            Err(AssayError::ExperimentConfig { .. })
        ));
        assert!(matches!(
            Experiment::new(1, 0, generate, operation),
            Err(AssayError::ExperimentConfig { .. })
        ));
    }
}
