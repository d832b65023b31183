//! Sequential test execution and reporting.
//!
//! A [`Session`] drives registered test functions one at a time, strictly in
//! order. Each test gets a fresh [`TestContext`], so pass-state and the
//! failure queue can never leak between tests. A test that faults, whether by
//! returning an error or by panicking, is reported under an `EXCEPT` header
//! and contained: the remaining tests still run.
//!
//! Faults travel on two channels and meet at this one boundary:
//!
//! * `Err(AssayError)`: the explicit channel for harness misuse and
//!   environment problems.
//! * panic: the abrupt channel for genuine bugs in the test body, caught
//!   with `catch_unwind`; a panic hook records the panic's file and line so
//!   the report can point at it.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::OnceCell;

use crate::context::TestContext;
use crate::errors::AssayError;
use crate::output::{ReportStyle, SharedOutput, GREEN, RED, YELLOW};

// ============================================================================
// PANIC SITE CAPTURE
// ============================================================================

thread_local! {
    static LAST_PANIC_SITE: RefCell<Option<(String, u32)>> = RefCell::new(None);
    static CAPTURING: Cell<bool> = Cell::new(false);
}

static RECORDER_HOOK: OnceCell<()> = OnceCell::new();

// The hook is process-global, so it is installed once and chains to whatever
// hook was there before. Only panics raised while a session test body is
// running on this thread are recorded and silenced; everything else keeps its
// normal behavior.
fn install_site_recorder() {
    RECORDER_HOOK.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                if let Some(location) = info.location() {
                    LAST_PANIC_SITE.with(|site| {
                        *site.borrow_mut() = Some((location.file().to_string(), location.line()));
                    });
                }
            } else {
                previous(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Where the runner is in the lifecycle of one test invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Reporting,
    Done,
}

/// Counts accumulated over one session, returned by [`Session::finish`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub faulted: usize,
}

impl SessionSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.faulted == 0
    }
}

/// Runs test functions sequentially and reports each outcome.
pub struct Session {
    style: ReportStyle,
    output: SharedOutput,
    state: RunState,
    summary: SessionSummary,
}

impl Session {
    /// A session reporting to stdout with default styling.
    pub fn new() -> Self {
        Self::with_output(ReportStyle::default(), SharedOutput::stdout())
    }

    pub fn with_output(style: ReportStyle, output: SharedOutput) -> Self {
        install_site_recorder();
        Self {
            style,
            output,
            state: RunState::NotStarted,
            summary: SessionSummary::default(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Prints the session banner.
    pub fn begin(&mut self, label: &str) {
        self.output.line("");
        self.output.line(&format!("===== Testing {} =====", label));
        self.output.line("");
    }

    /// Runs one test function in isolation and reports its outcome.
    ///
    /// The test gets a fresh context; whatever happens inside is reported
    /// here and goes no further.
    pub fn run_test<F>(&mut self, name: &str, test: F)
    where
        F: FnOnce(&mut TestContext) -> Result<(), AssayError>,
    {
        self.state = RunState::Running;
        let mut ctx = TestContext::new(name, self.output.clone());

        CAPTURING.with(|flag| flag.set(true));
        LAST_PANIC_SITE.with(|site| site.borrow_mut().take());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| test(&mut ctx)));
        CAPTURING.with(|flag| flag.set(false));

        self.state = RunState::Reporting;
        match outcome {
            Ok(Ok(())) => self.report_finished(&mut ctx),
            Ok(Err(error)) => self.report_error_fault(&mut ctx, error),
            Err(payload) => self.report_panic_fault(&mut ctx, payload.as_ref()),
        }
        self.summary.total += 1;
        self.state = RunState::Done;
    }

    /// Prints the summary line and hands back the counts. The caller decides
    /// what to do with them; the library never exits the process.
    pub fn finish(self) -> SessionSummary {
        let summary = self.summary;
        self.output.line("");
        self.output.line(&format!(
            "Test summary: total {}, {} {}, {} {}, {} {}",
            summary.total,
            self.style.colorize("passed", GREEN),
            summary.passed,
            self.style.colorize("failed", RED),
            summary.failed,
            self.style.colorize("faulted", YELLOW),
            summary.faulted,
        ));
        summary
    }

    // ------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------

    fn report_finished(&mut self, ctx: &mut TestContext) {
        let passed = ctx.passed();
        let tag = if passed {
            self.style.colorize("PASSED", GREEN)
        } else {
            self.style.colorize("FAILED", RED)
        };
        self.output.line(&format!("[{}] {}", tag, ctx.name()));
        self.drain_into_report(ctx);
        if passed {
            self.summary.passed += 1;
        } else {
            self.summary.failed += 1;
            self.output.line("");
        }
    }

    fn report_error_fault(&mut self, ctx: &mut TestContext, error: AssayError) {
        let tag = self.style.colorize("EXCEPT", RED);
        self.output.line(&format!(
            "[{}] {} - {} - {}",
            tag,
            ctx.name(),
            error.code_str(),
            error
        ));
        self.drain_into_report(ctx);
        self.summary.faulted += 1;
        // The header above is the contract; the rich report is for reading.
        eprintln!("{:?}", miette::Report::new(error));
    }

    fn report_panic_fault(&mut self, ctx: &mut TestContext, payload: &(dyn Any + Send)) {
        let (file, line) = LAST_PANIC_SITE
            .with(|site| site.borrow_mut().take())
            .unwrap_or_else(|| ("<unknown>".to_string(), 0));
        let tag = self.style.colorize("EXCEPT", RED);
        self.output.line(&format!(
            "[{}] {}:{} - panic - {}",
            tag,
            file,
            line,
            panic_message(payload)
        ));
        self.drain_into_report(ctx);
        self.summary.faulted += 1;
    }

    // Diagnostics queued before the test ended, oldest first, indented under
    // the header.
    fn drain_into_report(&mut self, ctx: &mut TestContext) {
        let lines: Vec<String> = ctx.drain_failures().collect();
        for failure in lines {
            self.output.line(&format!("\t* {}", failure));
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
