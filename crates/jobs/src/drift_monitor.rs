use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tscns_application::ports::DriftProbePort;

const DEFAULT_INTERVAL_MS: u64 = 1_000;

/// Periodically straddles a system-clock read between two fast-clock reads
/// and logs the result.
pub struct DriftMonitorJob {
    probe: Arc<dyn DriftProbePort>,
    interval_ms: u64,
    shutdown: CancellationToken,
}

impl DriftMonitorJob {
    pub fn new(probe: Arc<dyn DriftProbePort>) -> Self {
        Self {
            probe,
            interval_ms: DEFAULT_INTERVAL_MS,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_ms = self.interval_ms, "Starting drift monitor job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(self.interval_ms));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("DriftMonitorJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let sample = self.probe.probe();
                        if sample.is_valid() {
                            info!(
                                a2b_ns = sample.a2b(),
                                b2c_ns = sample.b2c(),
                                system_ns = sample.system_ns,
                                "Drift sample"
                            );
                        } else {
                            warn!(
                                a2b_ns = sample.a2b(),
                                b2c_ns = sample.b2c(),
                                error_ns = sample.error_ns(),
                                "Fast clock outside system clock straddle"
                            );
                        }
                    }
                }
            }
        });
    }
}
