//! Demonstration suite for the assay toolkit.
//!
//! Exercises every assertion primitive, both fault channels, and the timing
//! harness. Several cases fail or fault on purpose; the point is to show the
//! report, not to stay green. Run with `--filter <substring>` to select a
//! subset and `--no-color` for plain output.

use std::thread;
use std::time::Duration;

use assay::cli::{self, NamedTest};
use assay::{AssayError, TestContext};
use rand::Rng;

fn main() {
    const TESTS: &[NamedTest] = &[
        ("equal_numbers_pass", equal_numbers_pass),
        ("boolean_true_pass", boolean_true_pass),
        ("boolean_false_pass", boolean_false_pass),
        ("within_tolerance_pass", within_tolerance_pass),
        ("equal_numbers_fail", equal_numbers_fail),
        ("boolean_true_fail", boolean_true_fail),
        ("boolean_false_fail", boolean_false_fail),
        ("within_tolerance_fail", within_tolerance_fail),
        ("faulting_lookup", faulting_lookup),
        ("raises_explicit_fault", raises_explicit_fault),
        ("deadline_checks", deadline_checks),
        ("equal_strings_pass", equal_strings_pass),
        ("equal_strings_fail", equal_strings_fail),
        ("absent_value_pass", absent_value_pass),
        ("absent_value_fail", absent_value_fail),
        ("time_vec_front_insert", time_vec_front_insert),
        ("time_vec_index", time_vec_index),
    ];

    cli::run_suite("assay demo", TESTS);
}

// ----------------------------------------------------------------------
// Assertions
// ----------------------------------------------------------------------

fn equal_numbers_pass(t: &mut TestContext) -> Result<(), AssayError> {
    let expected = 10;
    let actual = 10;
    t.assert_eq(&expected, &actual);
    Ok(())
}

fn boolean_true_pass(t: &mut TestContext) -> Result<(), AssayError> {
    t.assert_true(10 == 10);
    Ok(())
}

fn boolean_false_pass(t: &mut TestContext) -> Result<(), AssayError> {
    t.assert_false(10 != 10);
    Ok(())
}

fn within_tolerance_pass(t: &mut TestContext) -> Result<(), AssayError> {
    t.assert_within(2.0, &10, &12);
    Ok(())
}

fn equal_numbers_fail(t: &mut TestContext) -> Result<(), AssayError> {
    t.assert_eq_msg(&10, &12, "intentional: the values differ");
    Ok(())
}

fn boolean_true_fail(t: &mut TestContext) -> Result<(), AssayError> {
    t.assert_true_msg(10 == 12, "intentional: the condition is false");
    Ok(())
}

fn boolean_false_fail(t: &mut TestContext) -> Result<(), AssayError> {
    t.assert_false_msg(10 != 12, "intentional: the condition is true");
    Ok(())
}

fn within_tolerance_fail(t: &mut TestContext) -> Result<(), AssayError> {
    t.assert_within_msg(1.0, &10, &12, "intentional: the gap exceeds the tolerance");
    Ok(())
}

fn equal_strings_pass(t: &mut TestContext) -> Result<(), AssayError> {
    t.assert_eq(&"dog", &"dog");
    Ok(())
}

fn equal_strings_fail(t: &mut TestContext) -> Result<(), AssayError> {
    t.assert_eq_msg(&"dog", &"cat", "intentional: the strings differ");
    Ok(())
}

fn absent_value_pass(t: &mut TestContext) -> Result<(), AssayError> {
    let missing: Option<&str> = None;
    t.assert_none(&missing);
    Ok(())
}

fn absent_value_fail(t: &mut TestContext) -> Result<(), AssayError> {
    t.assert_none_msg(&Some("dog"), "intentional: the value is present");
    Ok(())
}

// ----------------------------------------------------------------------
// Faults
// ----------------------------------------------------------------------

fn faulting_lookup(_t: &mut TestContext) -> Result<(), AssayError> {
    let values: Vec<i32> = Vec::new();
    let index = values.len();
    std::hint::black_box(values[index]);
    Ok(())
}

fn raises_explicit_fault(_t: &mut TestContext) -> Result<(), AssayError> {
    Err(AssayError::fault("demonstrating the explicit fault channel"))
}

// ----------------------------------------------------------------------
// Deadlines
// ----------------------------------------------------------------------

fn deadline_checks(t: &mut TestContext) -> Result<(), AssayError> {
    t.assert_in_time(1000, || thread::sleep(Duration::from_millis(10)));
    t.assert_in_time_msg(
        50,
        || thread::sleep(Duration::from_millis(400)),
        "intentional: the operation overruns the bound",
    );
    Ok(())
}

// ----------------------------------------------------------------------
// Timing experiments
// ----------------------------------------------------------------------

fn random_values(size: usize) -> Vec<u64> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

fn time_vec_front_insert(t: &mut TestContext) -> Result<(), AssayError> {
    t.time_experiment(100, 100_000, random_values, |_size: usize, data: &mut Vec<u64>| {
        data.insert(0, 0);
        data.pop();
    })
}

fn time_vec_index(t: &mut TestContext) -> Result<(), AssayError> {
    t.time_experiment(10_000, 100_000, random_values, |_size: usize, data: &mut Vec<u64>| {
        std::hint::black_box(data[0]);
    })
}
