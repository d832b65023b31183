//! Console output for sessions and timing reports.
//!
//! Every user-facing report line flows through a [`ReportSink`], so the
//! runner behaves identically against stdout and against an in-memory buffer.
//! Coloring is a formatting concern of the session, handled by
//! [`ReportStyle`]; sinks only ever see finished lines.

use std::cell::RefCell;
use std::rc::Rc;

// ============================================================================
// SINKS
// ============================================================================

/// Destination for finished report lines.
pub trait ReportSink {
    fn line(&mut self, text: &str);
}

/// Writes report lines to stdout.
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn line(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Collects report lines into a string, for tests and programmatic capture.
pub struct OutputBuffer {
    buffer: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for OutputBuffer {
    fn line(&mut self, text: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(text);
    }
}

/// Cloneable handle to a sink shared between a session and its test contexts.
#[derive(Clone)]
pub struct SharedOutput(pub Rc<RefCell<dyn ReportSink>>);

impl SharedOutput {
    pub fn new(sink: impl ReportSink + 'static) -> Self {
        Self(Rc::new(RefCell::new(sink)))
    }

    pub fn stdout() -> Self {
        Self::new(StdoutSink)
    }

    pub fn line(&self, text: &str) {
        self.0.borrow_mut().line(text);
    }
}

// ============================================================================
// STYLING
// ============================================================================

// Color constants for report headers
pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[31;1m";
pub const GREEN: &str = "\x1b[32;1m";
pub const YELLOW: &str = "\x1b[33m";

/// Controls ANSI coloring of pass/fail headers and the summary line.
#[derive(Debug, Clone, Copy)]
pub struct ReportStyle {
    pub use_colors: bool,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl ReportStyle {
    /// A style that never emits escape codes, whatever the terminal.
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Apply color formatting to text if colors are enabled.
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_joins_lines_with_newlines() {
        let mut buffer = OutputBuffer::new();
        buffer.line("first");
        buffer.line("second");
        assert_eq!(buffer.as_str(), "first\nsecond");
    }

    #[test]
    fn plain_style_passes_text_through() {
        let style = ReportStyle::plain();
        assert_eq!(style.colorize("PASSED", GREEN), "PASSED");
    }

    #[test]
    fn colored_style_wraps_and_resets() {
        let style = ReportStyle { use_colors: true };
        let text = style.colorize("FAILED", RED);
        assert!(text.starts_with(RED));
        assert!(text.ends_with(RESET));
    }
}
