//! Timing-experiment structure: tier sizes, ratios, and the rendered table.

mod common;

use assay::bench::{Experiment, SIZE_STEPS};
use assay::AssayError;
use common::buffered_context;

fn byte_input(size: usize) -> Vec<u8> {
    vec![0; size]
}

fn touch_first(_size: usize, data: &mut Vec<u8>) {
    std::hint::black_box(data.first().copied());
}

#[test]
fn five_doubling_tiers_in_ascending_order() {
    let experiment = Experiment::new(1, 10, byte_input, touch_first).unwrap();
    let report = experiment.run().unwrap();

    assert_eq!(report.rows.len(), SIZE_STEPS);
    let sizes: Vec<usize> = report.rows.iter().map(|row| row.size).collect();
    assert_eq!(sizes, vec![10, 20, 40, 80, 160]);
    assert_eq!(report.rows[0].ratio, 0.0);
    assert_eq!(report.trials, 1);
}

#[test]
fn zero_trials_or_zero_size_is_rejected() {
    let zero_trials = match Experiment::new(0, 10, byte_input, touch_first) {
        Err(err) => err,
        Ok(_) => panic!("zero trials must be rejected"),
    };
    assert!(matches!(zero_trials, AssayError::ExperimentConfig { .. }));
    assert_eq!(zero_trials.code_str(), "assay::experiment_config");

    assert!(matches!(
        Experiment::new(1, 0, byte_input, touch_first),
        Err(AssayError::ExperimentConfig { .. })
    ));
}

#[test]
fn thread_cpu_clock_is_available_here() {
    assert!(assay::clock::probe().is_ok());
}

#[test]
fn rendered_report_lists_every_tier_under_the_test_name() {
    let (buffer, mut ctx) = buffered_context("growth_probe");
    ctx.time_experiment(1, 10, byte_input, touch_first).unwrap();

    let report = buffer.borrow().as_str().to_string();
    assert!(report.contains("== Timing growth_probe =="));
    assert!(report.contains("Repetitions: 1"));
    assert_eq!(report.matches("Size: ").count(), SIZE_STEPS);
    assert!(report.contains("Average ratio:"));

    let positions: Vec<usize> = [10, 20, 40, 80, 160]
        .iter()
        .map(|size| report.find(&format!("Size: {},", size)).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}
