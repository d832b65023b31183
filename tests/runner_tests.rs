//! Session-level behavior: isolation, fault containment, and reporting.

mod common;

use assay::{AssayError, RunState};
use common::buffered_session;

#[test]
fn fault_in_one_test_does_not_stop_the_next() {
    let (buffer, mut session) = buffered_session();
    session.begin("isolation");
    session.run_test("explodes", |_t| {
        let values: Vec<i32> = Vec::new();
        let index = values.len();
        std::hint::black_box(values[index]);
        Ok(())
    });
    session.run_test("still_runs", |t| {
        t.assert_true(true);
        Ok(())
    });
    let summary = session.finish();

    let report = buffer.borrow().as_str().to_string();
    assert!(report.contains("[EXCEPT]"));
    assert!(report.contains("runner_tests.rs"));
    assert!(report.contains("[PASSED] still_runs"));
    assert_eq!(summary.total, 2);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.faulted, 1);
    assert!(!summary.all_passed());
}

#[test]
fn failures_do_not_leak_into_the_next_test() {
    let (buffer, mut session) = buffered_session();
    session.run_test("collects", |t| {
        t.assert_eq(&1, &2);
        t.assert_eq(&3, &4);
        Ok(())
    });
    session.run_test("clean", |t| {
        t.assert_true(true);
        Ok(())
    });
    let summary = session.finish();

    let report = buffer.borrow().as_str().to_string();
    assert!(report.contains("[FAILED] collects"));
    assert!(report.contains("[PASSED] clean"));
    // Every queued diagnostic was drained under the first header; nothing
    // carries over past the PASSED line.
    let after_pass = report.split("[PASSED] clean").nth(1).unwrap();
    assert!(!after_pass.contains("\t*"));
    assert_eq!(report.matches("\t*").count(), 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.passed, 1);
}

#[test]
fn diagnostics_queued_before_a_panic_are_still_printed() {
    let (buffer, mut session) = buffered_session();
    session.run_test("partial", |t| {
        t.assert_eq(&1, &2);
        panic!("boom");
    });
    session.finish();

    let report = buffer.borrow().as_str().to_string();
    assert!(report.contains("panic - boom"));
    assert!(report.contains("Expected 1, was 2"));
}

#[test]
fn error_channel_faults_report_their_diagnostic_code() {
    let (buffer, mut session) = buffered_session();
    session.run_test("misconfigured", |_t| Err(AssayError::fault("broken fixture")));
    let summary = session.finish();

    let report = buffer.borrow().as_str().to_string();
    assert!(report.contains("[EXCEPT] misconfigured - assay::fault - broken fixture"));
    assert_eq!(summary.faulted, 1);
}

#[test]
fn state_machine_ends_each_invocation_done() {
    let (_buffer, mut session) = buffered_session();
    assert_eq!(session.state(), RunState::NotStarted);
    session.run_test("anything", |t| {
        t.assert_true(true);
        Ok(())
    });
    assert_eq!(session.state(), RunState::Done);
}

#[test]
fn summary_line_carries_the_totals() {
    let (buffer, mut session) = buffered_session();
    session.run_test("green", |t| {
        t.assert_true(true);
        Ok(())
    });
    session.run_test("red", |t| {
        t.assert_true(false);
        Ok(())
    });
    session.finish();

    let report = buffer.borrow().as_str().to_string();
    assert!(report.contains("Test summary: total 2, passed 1, failed 1, faulted 0"));
}
