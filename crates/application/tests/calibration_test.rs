use std::sync::Arc;
use tscns_application::services::Tscns;
use tscns_domain::{CalibrationOutcome, ClockConfig, SkipReason, NS_PER_SEC};

mod helpers;
use helpers::{sim_clock, SimCounter, SimTimeline, SimWallClock};

const INTERVAL: i64 = 3 * NS_PER_SEC;

/// Clock bootstrapped with a frequency 1% above the simulated 3 GHz.
fn drifted_clock() -> (Arc<SimTimeline>, Tscns<SimCounter, SimWallClock>) {
    let (timeline, clock) = sim_clock(3.0, 100, ClockConfig::default());
    clock.init_with_frequency(3.0 * 1.01).unwrap();
    (timeline, clock)
}

fn advance_past_due(timeline: &SimTimeline) {
    timeline.advance(INTERVAL + INTERVAL / 10);
}

#[test]
fn test_calibrate_before_due_is_a_no_op() {
    let config = ClockConfig::default().with_intervals(2_000_000, INTERVAL);
    let (timeline, clock) = sim_clock(3.0, 100, config);
    clock.init().unwrap();

    let params = clock.parameters();
    let state = clock.calibration_state();
    timeline.advance(INTERVAL / 2);

    for _ in 0..1_000 {
        assert_eq!(clock.calibrate(), CalibrationOutcome::NotDue);
    }

    assert!(clock.parameters().bits_eq(&params));
    assert_eq!(clock.calibration_state(), state);
}

#[test]
fn test_calibration_converges_from_one_percent_rate_error() {
    let (timeline, clock) = drifted_clock();

    let mut errors = Vec::new();
    for _ in 0..5 {
        advance_past_due(&timeline);
        match clock.calibrate() {
            CalibrationOutcome::Updated(report) => errors.push(report.observed_error_ns.abs()),
            other => panic!("expected an update, got {:?}", other),
        }
    }

    for pair in errors.windows(2) {
        assert!(pair[1] < pair[0], "error did not shrink: {:?}", errors);
    }
    assert!(errors[0] > 10_000_000, "initial error too small: {:?}", errors);
    assert!(errors[4] < 100_000, "did not converge: {:?}", errors);
    assert!((clock.frequency_ghz() - 3.0).abs() < 1e-3);
}

#[test]
fn test_calibration_does_not_jump_the_exposed_clock() {
    let (timeline, clock) = drifted_clock();
    advance_past_due(&timeline);

    let before = clock.rdns();
    let outcome = clock.calibrate();
    let after = clock.rdns();

    let report = outcome.report().copied().expect("calibration should have run");
    assert!(
        report.observed_error_ns.abs() > 1_000_000,
        "setup should have accumulated drift, got {} ns",
        report.observed_error_ns
    );
    assert_ne!(report.ns_per_cycle, report.previous_ns_per_cycle);
    assert!(after >= before);
    assert!(after - before < 10_000, "clock jumped by {} ns", after - before);
}

#[test]
fn test_published_base_is_previous_prediction() {
    let (timeline, clock) = drifted_clock();
    let old = clock.parameters();
    advance_past_due(&timeline);

    let report = clock.calibrate().report().copied().unwrap();
    let new = clock.parameters();

    assert_eq!(new.base_cycles, report.anchor_cycles);
    assert_eq!(new.base_ns, old.convert(report.anchor_cycles));
    assert_eq!(new.base_ns - report.anchor_wall_ns, report.observed_error_ns);
    assert_eq!(clock.calibration_state().last_observed_error_ns, report.observed_error_ns);
    assert_eq!(clock.calibration_state().last_measured_wall_ns, report.anchor_wall_ns);
}

#[test]
fn test_tsc2ns_is_monotonic_across_calibrations() {
    let (timeline, clock) = drifted_clock();

    let mut last_converted = i64::MIN;
    let mut last_rdns = i64::MIN;
    let mut updates = 0;
    for round in 0..2_000 {
        let cycles = clock.rdtsc();
        let converted = clock.tsc2ns(cycles);
        assert!(converted >= last_converted, "went backwards at round {}", round);
        last_converted = converted;

        let now = clock.rdns();
        assert!(now >= last_rdns, "rdns went backwards at round {}", round);
        last_rdns = now;

        if round % 100 == 99 {
            advance_past_due(&timeline);
            if clock.calibrate().is_updated() {
                updates += 1;
            }
        } else {
            timeline.advance(1_000);
        }
    }

    assert_eq!(updates, 20);
}

#[test]
fn test_wall_clock_stepping_back_skips_update() {
    let (timeline, clock) = sim_clock(3.0, 100, ClockConfig::default());
    clock.init_with_frequency(3.0).unwrap();
    let params = clock.parameters();

    advance_past_due(&timeline);
    timeline.step_wall(-10 * NS_PER_SEC);

    assert_eq!(
        clock.calibrate(),
        CalibrationOutcome::Skipped {
            reason: SkipReason::NoElapsedTime
        }
    );
    assert!(clock.parameters().bits_eq(&params));
    assert_eq!(clock.calibrate(), CalibrationOutcome::NotDue);
}

#[test]
fn test_wall_clock_step_forward_is_clamped() {
    let (timeline, clock) = sim_clock(3.0, 100, ClockConfig::default());
    clock.init_with_frequency(3.0).unwrap();

    advance_past_due(&timeline);
    timeline.step_wall(NS_PER_SEC);

    let report = clock.calibrate().report().copied().unwrap();

    assert!(report.clamped);
    assert_eq!(report.predicted_next_error_ns, -300_000_000);
    let ratio = report.ns_per_cycle / report.previous_ns_per_cycle;
    assert!((ratio - 1.1).abs() < 1e-9, "slope ratio {}", ratio);
}

#[test]
fn test_reinit_discards_drift_history() {
    let (timeline, clock) = drifted_clock();
    advance_past_due(&timeline);
    assert!(clock.calibrate().is_updated());
    assert_ne!(clock.calibration_state().last_observed_error_ns, 0);

    clock.init().unwrap();

    assert_eq!(clock.calibration_state().last_observed_error_ns, 0);
    assert!((clock.frequency_ghz() - 3.0).abs() < 1e-6);
}
