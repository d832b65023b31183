//! Command-line driver for demonstration suites.
//!
//! The library itself never parses arguments or exits the process; this
//! module is the thin surface a `src/bin` entry point calls with its
//! registered tests.

use std::process;

use clap::Parser;
use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::context::TestContext;
use crate::errors::AssayError;
use crate::output::{ReportStyle, SharedOutput};
use crate::runner::Session;

/// A named test function as registered with the driver.
pub type NamedTest = (
    &'static str,
    fn(&mut TestContext) -> Result<(), AssayError>,
);

/// The driver's argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "assay",
    version,
    about = "A minimal, embeddable unit-testing and micro-benchmarking toolkit."
)]
pub struct AssayArgs {
    /// Only run tests whose name contains this substring (case-insensitive).
    #[arg(long)]
    pub filter: Option<String>,

    /// Disable ANSI colors in the report.
    #[arg(long)]
    pub no_color: bool,
}

/// Parses the command line, runs the registered suite, and exits the process
/// with 0 only if every selected test passed.
pub fn run_suite(label: &str, tests: &[NamedTest]) -> ! {
    let args = AssayArgs::parse();
    let style = if args.no_color {
        ReportStyle::plain()
    } else {
        ReportStyle::default()
    };

    let filter = args.filter.as_deref().map(str::to_lowercase);
    let selected: Vec<NamedTest> = tests
        .iter()
        .copied()
        .filter(|(name, _)| {
            filter
                .as_deref()
                .map_or(true, |wanted| name.to_lowercase().contains(wanted))
        })
        .collect();

    print_plan(selected.len(), tests.len());

    let mut session = Session::with_output(style, SharedOutput::stdout());
    session.begin(label);
    for (name, test) in &selected {
        session.run_test(name, *test);
    }
    let summary = session.finish();
    process::exit(if summary.all_passed() { 0 } else { 1 });
}

fn print_plan(selected: usize, registered: usize) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_bold(true));
    if selected == registered {
        println!("Running {} registered tests", selected);
    } else {
        println!("Running {} of {} registered tests", selected, registered);
    }
    let _ = stdout.reset();
}
