use serde::{Deserialize, Serialize};

/// Settings for the background calibration and drift-report jobs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// How often the calibration job polls `calibrate()`; it is a no-op
    /// until the calibration interval has elapsed.
    #[serde(default = "default_calibrate_poll_ms")]
    pub calibrate_poll_ms: u64,

    #[serde(default = "default_drift_report_ms")]
    pub drift_report_ms: u64,

    /// Core to pin the process to before bootstrapping the clock.
    #[serde(default)]
    pub cpu: Option<usize>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            calibrate_poll_ms: default_calibrate_poll_ms(),
            drift_report_ms: default_drift_report_ms(),
            cpu: None,
        }
    }
}

fn default_calibrate_poll_ms() -> u64 {
    100
}

fn default_drift_report_ms() -> u64 {
    1000
}
