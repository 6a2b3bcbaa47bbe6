use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tscns_application::ports::{CalibrationOutcome, CalibrationPort};

const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Polls `calibrate()` on a fixed period.
///
/// Polling is cheap while no calibration is due, so the period only bounds
/// how late a due calibration can run. Keep it well under the clock's
/// calibration interval.
pub struct CalibrationJob {
    calibration: Arc<dyn CalibrationPort>,
    poll_interval_ms: u64,
    shutdown: CancellationToken,
}

impl CalibrationJob {
    pub fn new(calibration: Arc<dyn CalibrationPort>) -> Self {
        Self {
            calibration,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            poll_interval_ms = self.poll_interval_ms,
            tsc_ghz = self.calibration.frequency_ghz(),
            "Starting calibration job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(self.poll_interval_ms));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("CalibrationJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.calibration.calibrate() {
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
                }
            }
        });
    }
}
