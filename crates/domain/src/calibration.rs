use crate::sample::Anchor;
use serde::Serialize;
use std::fmt;

/// Writer-private bookkeeping carried from one calibration to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibrationState {
    pub last_measured_wall_ns: i64,
    pub last_observed_error_ns: i64,
    pub next_calibration_due_at: i64,
    pub calibration_interval_ns: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub anchor_cycles: i64,
    pub anchor_wall_ns: i64,
    /// Published clock minus system clock at the anchor.
    pub observed_error_ns: i64,
    /// Error expected at the next calibration had the slope been kept.
    pub predicted_next_error_ns: i64,
    pub clamped: bool,
    pub previous_ns_per_cycle: f64,
    pub ns_per_cycle: f64,
}

impl CalibrationReport {
    pub fn new(anchor: &Anchor, observed_error_ns: i64) -> Self {
        Self {
            anchor_cycles: anchor.cycles,
            anchor_wall_ns: anchor.wall_ns,
            observed_error_ns,
            predicted_next_error_ns: 0,
            clamped: false,
            previous_ns_per_cycle: 0.0,
            ns_per_cycle: 0.0,
        }
    }

    pub fn frequency_ghz(&self) -> f64 {
        1.0 / self.ns_per_cycle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// No wall time elapsed since the previous calibration.
    NoElapsedTime,
    /// The corrected slope came out non-finite or non-positive.
    InvalidSlope,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoElapsedTime => write!(f, "no wall time elapsed since last calibration"),
            SkipReason::InvalidSlope => write!(f, "corrected slope is not a positive finite value"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationOutcome {
    NotDue,
    Busy,
    Skipped { reason: SkipReason },
    Updated(CalibrationReport),
}

impl CalibrationOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, CalibrationOutcome::Updated(_))
    }

    pub fn report(&self) -> Option<&CalibrationReport> {
        match self {
            CalibrationOutcome::Updated(report) => Some(report),
            _ => None,
        }
    }
}
