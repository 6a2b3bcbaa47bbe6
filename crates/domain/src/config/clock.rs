use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// Upper bound on wall-clock trials per sampling round.
pub const MAX_SYNC_TRIALS: usize = 15;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClockConfig {
    /// Warm-up window between the two bootstrap anchors.
    #[serde(default = "default_init_calibrate_ns")]
    pub init_calibrate_ns: i64,

    /// Wall time between drift corrections.
    #[serde(default = "default_calibrate_interval_ns")]
    pub calibrate_interval_ns: i64,

    /// Wall-clock reads per sampling round.
    #[serde(default = "default_sync_trials")]
    pub sync_trials: usize,

    /// The system clock only advances in coarse steps (100 ns on Windows):
    /// de-duplicate identical readings when picking an anchor.
    #[serde(default = "default_coarse_wall_clock")]
    pub coarse_wall_clock: bool,

    /// Largest predicted error the slope is corrected for, as a fraction of
    /// the calibration interval.
    #[serde(default = "default_max_correction_ratio")]
    pub max_correction_ratio: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            init_calibrate_ns: default_init_calibrate_ns(),
            calibrate_interval_ns: default_calibrate_interval_ns(),
            sync_trials: default_sync_trials(),
            coarse_wall_clock: default_coarse_wall_clock(),
            max_correction_ratio: default_max_correction_ratio(),
        }
    }
}

impl ClockConfig {
    pub fn with_intervals(mut self, init_calibrate_ns: i64, calibrate_interval_ns: i64) -> Self {
        self.init_calibrate_ns = init_calibrate_ns;
        self.calibrate_interval_ns = calibrate_interval_ns;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.init_calibrate_ns <= 0 {
            return Err(ConfigError::Validation(
                "init_calibrate_ns must be positive".to_string(),
            ));
        }
        if self.calibrate_interval_ns <= 1_000 {
            return Err(ConfigError::Validation(format!(
                "calibrate_interval_ns must exceed 1000, got {}",
                self.calibrate_interval_ns
            )));
        }
        if self.sync_trials == 0 || self.sync_trials > MAX_SYNC_TRIALS {
            return Err(ConfigError::Validation(format!(
                "sync_trials must be between 1 and {}, got {}",
                MAX_SYNC_TRIALS, self.sync_trials
            )));
        }
        if !(self.max_correction_ratio > 0.0 && self.max_correction_ratio <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "max_correction_ratio must be in (0, 1], got {}",
                self.max_correction_ratio
            )));
        }
        Ok(())
    }
}

fn default_init_calibrate_ns() -> i64 {
    20_000_000
}

fn default_calibrate_interval_ns() -> i64 {
    3 * crate::NS_PER_SEC
}

fn default_sync_trials() -> usize {
    if cfg!(windows) {
        15
    } else {
        3
    }
}

fn default_coarse_wall_clock() -> bool {
    cfg!(windows)
}

fn default_max_correction_ratio() -> f64 {
    0.1
}
