use chrono::{DateTime, SecondsFormat};
use std::hint::black_box;
use tracing::{debug, warn};
use tscns_domain::{CalibrationOutcome, DriftSample};
use tscns_infrastructure::SystemTscns;

const LATENCY_PROBES: i64 = 10;

/// Calibrate once per period and print how the fast clock compares with
/// the system clock right after.
pub fn run(clock: &SystemTscns, count: Option<u64>, period_ms: u64) -> anyhow::Result<()> {
    let rdns_latency = rdns_latency(clock);
    println!("tsc_ghz: {:.15}, rdns_latency: {} ns", clock.frequency_ghz(), rdns_latency);

    let period_ns = (period_ms as i64).saturating_mul(1_000_000);
    let mut round = 0u64;
    while count.map_or(true, |n| round < n) {
        let a = clock.rdns();
        let outcome = clock.calibrate();
        let b = clock.rdns();
        let c = clock.rdsysns();
        let d = clock.rdns();

        let sample = DriftSample::new(b, c, d);
        let calibrate_latency = b - a - rdns_latency;
        let rdsysns_latency = d - b - rdns_latency;
        log_outcome(&outcome);
        if !sample.is_valid() {
            warn!(error_ns = sample.error_ns(), "Fast clock outside system clock straddle");
        }

        println!(
            "{} calibration: {}, calibrate_latency: {}, tsc_ghz: {:.15}, b2c: {}, c2d: {}, err: {}, rdsysns_latency: {}",
            format_wall(c),
            outcome_label(&outcome),
            calibrate_latency,
            clock.frequency_ghz(),
            sample.a2b(),
            sample.b2c(),
            sample.error_ns(),
            rdsysns_latency
        );

        round += 1;
        let expire = clock.rdns().saturating_add(period_ns);
        while clock.rdns() < expire {
            std::thread::yield_now();
        }
    }
    Ok(())
}

fn log_outcome(outcome: &CalibrationOutcome) {
    match outcome {
        CalibrationOutcome::Updated(report) => {
            debug!(
                observed_error_ns = report.observed_error_ns,
                predicted_next_error_ns = report.predicted_next_error_ns,
                clamped = report.clamped,
                tsc_ghz = report.frequency_ghz(),
                "Calibration applied"
            );
        }
        CalibrationOutcome::Skipped { reason } => {
            warn!(%reason, "Calibration skipped");
        }
        CalibrationOutcome::NotDue | CalibrationOutcome::Busy => {}
    }
}

fn outcome_label(outcome: &CalibrationOutcome) -> &'static str {
    match outcome {
        CalibrationOutcome::NotDue => "not-due",
        CalibrationOutcome::Busy => "busy",
        CalibrationOutcome::Skipped { .. } => "skipped",
        CalibrationOutcome::Updated(report) if report.clamped => "clamped",
        CalibrationOutcome::Updated(_) => "updated",
    }
}

fn rdns_latency(clock: &SystemTscns) -> i64 {
    let first = clock.rdns();
    let mut last = first;
    for _ in 0..LATENCY_PROBES {
        last = black_box(clock.rdns());
    }
    (last - first) / LATENCY_PROBES
}

fn format_wall(ns: i64) -> String {
    DateTime::from_timestamp_nanos(ns).to_rfc3339_opts(SecondsFormat::Nanos, true)
}
