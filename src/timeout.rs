//! Bounded-wait execution for timeout checks.
//!
//! The operation runs on its own thread while the caller waits on a channel
//! with a deadline. An operation that overruns is abandoned, not killed:
//! there is no cancellation primitive, and the thread keeps running until it
//! finishes on its own. Callers timing large workloads should expect that
//! leak.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// What became of an operation that was given a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineOutcome {
    /// The operation finished inside the deadline.
    Completed,
    /// The deadline elapsed with the operation still running; its thread is
    /// abandoned.
    TimedOut,
    /// The operation's thread went away without reporting completion, so the
    /// wait could not finish normally.
    Broken,
}

/// Runs `op` on a new thread and waits at most `limit` for it to finish.
pub fn run_with_deadline<F>(limit: Duration, op: F) -> DeadlineOutcome
where
    F: FnOnce() + Send + 'static,
{
    let (done_tx, done_rx) = mpsc::channel();
    thread::spawn(move || {
        op();
        // The receiver may already have given up on us.
        let _ = done_tx.send(());
    });

    match done_rx.recv_timeout(limit) {
        Ok(()) => DeadlineOutcome::Completed,
        Err(RecvTimeoutError::Timeout) => DeadlineOutcome::TimedOut,
        Err(RecvTimeoutError::Disconnected) => DeadlineOutcome::Broken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_operation_completes() {
        let outcome = run_with_deadline(Duration::from_millis(1000), || {
            thread::sleep(Duration::from_millis(5));
        });
        assert_eq!(outcome, DeadlineOutcome::Completed);
    }

    #[test]
    fn slow_operation_times_out() {
        let outcome = run_with_deadline(Duration::from_millis(20), || {
            thread::sleep(Duration::from_millis(500));
        });
        assert_eq!(outcome, DeadlineOutcome::TimedOut);
    }
}
