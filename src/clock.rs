//! Per-thread CPU clock used by timing experiments.
//!
//! Experiments measure CPU time consumed by the measuring thread itself, so
//! scheduler noise and sibling workers cannot pollute the averages. There is
//! no fallback: if the platform cannot report thread CPU time, starting a
//! timer fails and the experiment fails with it, loudly, instead of quietly
//! timing something incomparable.

use std::time::Duration;

use cpu_time::ThreadTime;

use crate::errors::AssayError;

pub struct ThreadCpuTimer(ThreadTime);

impl ThreadCpuTimer {
    /// Starts a timer on the calling thread's CPU clock.
    pub fn start() -> Result<Self, AssayError> {
        ThreadTime::try_now()
            .map(Self)
            .map_err(|source| AssayError::ClockUnsupported { source })
    }

    /// CPU time this thread has consumed since the timer was started.
    pub fn elapsed(&self) -> Result<Duration, AssayError> {
        self.0
            .try_elapsed()
            .map_err(|source| AssayError::ClockUnsupported { source })
    }
}

/// Confirms the thread CPU clock works before any worker is spawned.
pub fn probe() -> Result<(), AssayError> {
    ThreadCpuTimer::start().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_loop_consumes_cpu_time() {
        let timer = ThreadCpuTimer::start().unwrap();
        let mut acc = 0u64;
        for i in 0..200_000u64 {
            acc = acc.wrapping_add(i * i);
        }
        std::hint::black_box(acc);
        let elapsed = timer.elapsed().unwrap();
        assert!(elapsed > Duration::ZERO);
    }
}
