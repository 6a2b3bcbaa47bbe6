use serde::Serialize;

/// Amortized per-call cost of each clock read, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencyReport {
    pub iterations: u64,
    pub rdsysns_ns: f64,
    pub rdtsc_ns: f64,
    pub rdns_ns: f64,
}

/// One `rdns` / `rdsysns` / `rdns` straddle.
///
/// A well-calibrated clock reads the system clock between the two fast
/// reads, so both legs are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DriftSample {
    pub before_ns: i64,
    pub system_ns: i64,
    pub after_ns: i64,
}

impl DriftSample {
    pub fn new(before_ns: i64, system_ns: i64, after_ns: i64) -> Self {
        Self {
            before_ns,
            system_ns,
            after_ns,
        }
    }

    pub fn a2b(&self) -> i64 {
        self.system_ns - self.before_ns
    }

    pub fn b2c(&self) -> i64 {
        self.after_ns - self.system_ns
    }

    pub fn is_valid(&self) -> bool {
        self.a2b() >= 0 && self.b2c() >= 0
    }

    /// How far the fast clock strayed outside the straddle; zero when valid.
    pub fn error_ns(&self) -> i64 {
        if self.a2b() < 0 {
            -self.a2b()
        } else if self.b2c() < 0 {
            -self.b2c()
        } else {
            0
        }
    }
}
