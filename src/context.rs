//! Per-test state and the assertion primitives.
//!
//! A fresh [`TestContext`] is handed to every test function, carrying the
//! test's name, its pass flag, and the pending-failure queue. Assertions
//! never unwind on mere failure: a failing check appends one formatted
//! diagnostic and the test keeps running. The queue is strictly
//! first-in-first-out; the report lists failures in the order they happened.
//!
//! Call sites are captured with `#[track_caller]`, so each diagnostic points
//! at the line in the test body that made the failing call, not at the
//! assertion helper.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::panic::Location;
use std::time::Duration;

use crate::bench::Experiment;
use crate::errors::AssayError;
use crate::output::SharedOutput;
use crate::timeout::{run_with_deadline, DeadlineOutcome};

// ============================================================================
// SIGNED DISTANCE
// ============================================================================

/// Total-order comparison yielding a signed magnitude.
///
/// Tolerance checks accept any type with such a comparison, not only types
/// that subtract: the sign carries direction, the magnitude is held against
/// the tolerance.
pub trait Distance {
    fn distance_to(&self, other: &Self) -> f64;
}

macro_rules! impl_distance {
    ($($t:ty),* $(,)?) => {
        $(impl Distance for $t {
            fn distance_to(&self, other: &Self) -> f64 {
                *self as f64 - *other as f64
            }
        })*
    };
}

impl_distance!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

// ============================================================================
// TEST CONTEXT
// ============================================================================

/// State owned by one test invocation.
pub struct TestContext {
    name: String,
    passed: bool,
    failures: VecDeque<String>,
    output: SharedOutput,
}

impl TestContext {
    pub fn new(name: impl Into<String>, output: SharedOutput) -> Self {
        Self {
            name: name.into(),
            passed: true,
            failures: VecDeque::new(),
            output,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True until the first failure is recorded.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Pending diagnostics, oldest first.
    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(String::as_str)
    }

    pub(crate) fn drain_failures(&mut self) -> impl Iterator<Item = String> + '_ {
        self.failures.drain(..)
    }

    // All assertion kinds funnel into this one recording operation. The
    // diagnostic is rendered to text here and now; only the string is kept.
    fn record_failure(
        &mut self,
        site: &Location<'_>,
        expected: Option<String>,
        actual: Option<String>,
        delta: Option<String>,
        message: Option<&str>,
    ) {
        self.passed = false;
        let mut text = format!("{}:{}", site.file(), site.line());
        if let (Some(expected), Some(actual)) = (&expected, &actual) {
            text.push_str(&format!(" - Expected {}, was {}", expected, actual));
            if let Some(delta) = &delta {
                text.push_str(&format!(" within {}", delta));
            }
        }
        if let Some(message) = message {
            text.push_str(&format!(" - {}", message));
        }
        self.failures.push_back(text);
    }

    // ------------------------------------------------------------------
    // Equality
    // ------------------------------------------------------------------

    /// Checks that two values are equal under `PartialEq`.
    #[track_caller]
    pub fn assert_eq<T: PartialEq + Debug>(&mut self, expected: &T, actual: &T) {
        self.check_eq(expected, actual, None);
    }

    /// Like [`assert_eq`](Self::assert_eq), with a message printed on failure.
    #[track_caller]
    pub fn assert_eq_msg<T: PartialEq + Debug>(&mut self, expected: &T, actual: &T, message: &str) {
        self.check_eq(expected, actual, Some(message));
    }

    #[track_caller]
    fn check_eq<T: PartialEq + Debug>(&mut self, expected: &T, actual: &T, message: Option<&str>) {
        if expected != actual {
            self.record_failure(
                Location::caller(),
                Some(format!("{:?}", expected)),
                Some(format!("{:?}", actual)),
                None,
                message,
            );
        }
    }

    // ------------------------------------------------------------------
    // Absence
    // ------------------------------------------------------------------

    /// Checks that an optional value is absent.
    #[track_caller]
    pub fn assert_none<T: Debug>(&mut self, actual: &Option<T>) {
        self.check_none(actual, None);
    }

    #[track_caller]
    pub fn assert_none_msg<T: Debug>(&mut self, actual: &Option<T>, message: &str) {
        self.check_none(actual, Some(message));
    }

    #[track_caller]
    fn check_none<T: Debug>(&mut self, actual: &Option<T>, message: Option<&str>) {
        if let Some(value) = actual {
            self.record_failure(
                Location::caller(),
                Some("None".to_string()),
                Some(format!("{:?}", value)),
                None,
                message,
            );
        }
    }

    // ------------------------------------------------------------------
    // Boolean polarity
    // ------------------------------------------------------------------

    #[track_caller]
    pub fn assert_true(&mut self, condition: bool) {
        self.check_bool(true, condition, None);
    }

    #[track_caller]
    pub fn assert_true_msg(&mut self, condition: bool, message: &str) {
        self.check_bool(true, condition, Some(message));
    }

    #[track_caller]
    pub fn assert_false(&mut self, condition: bool) {
        self.check_bool(false, condition, None);
    }

    #[track_caller]
    pub fn assert_false_msg(&mut self, condition: bool, message: &str) {
        self.check_bool(false, condition, Some(message));
    }

    // On failure the diagnostic uses the literal expected polarity.
    #[track_caller]
    fn check_bool(&mut self, polarity: bool, condition: bool, message: Option<&str>) {
        if condition != polarity {
            self.record_failure(
                Location::caller(),
                Some(polarity.to_string()),
                Some(condition.to_string()),
                None,
                message,
            );
        }
    }

    // ------------------------------------------------------------------
    // Numeric tolerance
    // ------------------------------------------------------------------

    /// Checks that `expected` and `actual` lie within `delta` of each other
    /// under their [`Distance`] comparison.
    ///
    /// `delta` must be positive; a non-positive delta is harness misuse and
    /// aborts the test.
    #[track_caller]
    pub fn assert_within<T: Distance + Debug>(&mut self, delta: f64, expected: &T, actual: &T) {
        self.check_within(delta, expected, actual, None);
    }

    #[track_caller]
    pub fn assert_within_msg<T: Distance + Debug>(
        &mut self,
        delta: f64,
        expected: &T,
        actual: &T,
        message: &str,
    ) {
        self.check_within(delta, expected, actual, Some(message));
    }

    #[track_caller]
    fn check_within<T: Distance + Debug>(
        &mut self,
        delta: f64,
        expected: &T,
        actual: &T,
        message: Option<&str>,
    ) {
        if !(delta > 0.0) {
            panic!("assert_within requires a positive delta, got {}", delta);
        }
        if expected.distance_to(actual).abs() > delta {
            self.record_failure(
                Location::caller(),
                Some(format!("{:?}", expected)),
                Some(format!("{:?}", actual)),
                Some(delta.to_string()),
                message,
            );
        }
    }

    // ------------------------------------------------------------------
    // Timeout
    // ------------------------------------------------------------------

    /// Checks that `op` finishes within `limit_ms` milliseconds.
    ///
    /// The operation runs on its own thread. If it overruns the bound the
    /// check fails and the thread is abandoned, not killed; it keeps running
    /// until it finishes on its own. The failure is reported as a tolerance
    /// miss around the midpoint of the bound.
    #[track_caller]
    pub fn assert_in_time<F>(&mut self, limit_ms: u64, op: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.check_in_time(limit_ms, op, None);
    }

    #[track_caller]
    pub fn assert_in_time_msg<F>(&mut self, limit_ms: u64, op: F, message: &str)
    where
        F: FnOnce() + Send + 'static,
    {
        self.check_in_time(limit_ms, op, Some(message));
    }

    #[track_caller]
    fn check_in_time<F>(&mut self, limit_ms: u64, op: F, message: Option<&str>)
    where
        F: FnOnce() + Send + 'static,
    {
        if limit_ms == 0 {
            panic!("assert_in_time requires a positive limit");
        }
        let site = Location::caller();
        match run_with_deadline(Duration::from_millis(limit_ms), op) {
            DeadlineOutcome::Completed => {}
            DeadlineOutcome::TimedOut | DeadlineOutcome::Broken => {
                let half = limit_ms as f64 / 2.0;
                self.record_failure(
                    site,
                    Some(half.to_string()),
                    Some((limit_ms as f64 + 1.0).to_string()),
                    Some(half.to_string()),
                    message,
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Timing experiments
    // ------------------------------------------------------------------

    /// Runs a growth-rate timing experiment and prints its report, labeled
    /// with this test's name.
    ///
    /// `generate` builds one input of the given size per size tier;
    /// `operation` is timed `trials` times against that input. See
    /// [`Experiment`] for the execution model.
    pub fn time_experiment<I, G, O>(
        &mut self,
        trials: u32,
        initial_size: usize,
        generate: G,
        operation: O,
    ) -> Result<(), AssayError>
    where
        G: Fn(usize) -> I + Sync,
        O: Fn(usize, &mut I) + Sync,
    {
        let report = Experiment::new(trials, initial_size, generate, operation)?.run()?;
        report.render(&self.name, &self.output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputBuffer;

    fn context() -> TestContext {
        TestContext::new("unit", SharedOutput::new(OutputBuffer::new()))
    }

    #[test]
    fn distance_is_signed() {
        assert_eq!(10i32.distance_to(&12), -2.0);
        assert_eq!(12i32.distance_to(&10), 2.0);
        assert_eq!(3.5f64.distance_to(&3.5), 0.0);
    }

    #[test]
    fn failures_drain_oldest_first() {
        let mut ctx = context();
        ctx.assert_eq(&1, &2);
        ctx.assert_eq(&3, &4);
        let drained: Vec<String> = ctx.drain_failures().collect();
        assert!(drained[0].contains("Expected 1, was 2"));
        assert!(drained[1].contains("Expected 3, was 4"));
        assert_eq!(ctx.failures().count(), 0);
    }

    #[test]
    fn bool_failure_uses_literal_polarity() {
        let mut ctx = context();
        ctx.assert_false(true);
        let diagnostic = ctx.failures().next().unwrap().to_string();
        assert!(diagnostic.contains("Expected false, was true"));
    }
}
