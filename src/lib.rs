pub use crate::context::{Distance, TestContext};
pub use crate::errors::AssayError;
pub use crate::output::{OutputBuffer, ReportSink, ReportStyle, SharedOutput, StdoutSink};
pub use crate::runner::{RunState, Session, SessionSummary};

pub mod bench;
pub mod cli;
pub mod clock;
pub mod context;
pub mod errors;
pub mod output;
pub mod runner;
pub mod timeout;
