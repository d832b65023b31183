//! Unified error type for the assay toolkit.
//!
//! Assertion failures are not errors. A failing check records a diagnostic on
//! the test context and execution continues; nothing here is involved.
//! `AssayError` covers the faults that abort a single test: environment
//! problems (no per-thread CPU clock), harness misuse (an experiment that
//! cannot run), and faults a test body raises through the explicit channel.
//! All of them are caught at one boundary, the session runner, and never
//! escape past it.

use std::fmt;
use std::io;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssayError {
    /// The per-thread CPU clock could not be read. Timing experiments never
    /// fall back to wall-clock time; the two are not comparable.
    #[error("thread CPU clock unavailable: {source}")]
    ClockUnsupported {
        #[source]
        source: io::Error,
    },

    /// An experiment was constructed with values it cannot run with.
    #[error("experiment misconfigured: {reason}")]
    ExperimentConfig { reason: String },

    /// A timing worker died before producing its average.
    #[error("timing worker for size {size} panicked")]
    WorkerPanicked { size: usize },

    /// A fault raised by a test body through the error channel.
    #[error("{message}")]
    Fault { message: String },
}

impl AssayError {
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault {
            message: message.into(),
        }
    }

    pub fn experiment_config(reason: impl Into<String>) -> Self {
        Self::ExperimentConfig {
            reason: reason.into(),
        }
    }

    /// Stable diagnostic code, also printed in the EXCEPT report header.
    pub fn code_str(&self) -> &'static str {
        match self {
            Self::ClockUnsupported { .. } => "assay::clock_unsupported",
            Self::ExperimentConfig { .. } => "assay::experiment_config",
            Self::WorkerPanicked { .. } => "assay::worker_panicked",
            Self::Fault { .. } => "assay::fault",
        }
    }
}

impl Diagnostic for AssayError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Self::ClockUnsupported { .. } => Some(Box::new(
                "timing experiments need per-thread CPU time; run on a platform that exposes it",
            )),
            Self::ExperimentConfig { .. } => {
                Some(Box::new("trial count and initial size must both be positive"))
            }
            Self::WorkerPanicked { .. } | Self::Fault { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let err = AssayError::experiment_config("trial count must be positive");
        assert_eq!(err.code_str(), "assay::experiment_config");
        assert_eq!(AssayError::fault("boom").code_str(), "assay::fault");
    }

    #[test]
    fn display_carries_the_reason() {
        let err = AssayError::experiment_config("initial size must be positive");
        assert!(err.to_string().contains("initial size must be positive"));
    }
}
