//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use assay::{OutputBuffer, ReportStyle, Session, SharedOutput, TestContext};

/// A buffered sink plus the shared handle for driving the library against it.
pub fn capture() -> (Rc<RefCell<OutputBuffer>>, SharedOutput) {
    let buffer = Rc::new(RefCell::new(OutputBuffer::new()));
    let output = SharedOutput(buffer.clone());
    (buffer, output)
}

pub fn buffered_session() -> (Rc<RefCell<OutputBuffer>>, Session) {
    let (buffer, output) = capture();
    (buffer, Session::with_output(ReportStyle::plain(), output))
}

pub fn buffered_context(name: &str) -> (Rc<RefCell<OutputBuffer>>, TestContext) {
    let (buffer, output) = capture();
    (buffer, TestContext::new(name, output))
}
