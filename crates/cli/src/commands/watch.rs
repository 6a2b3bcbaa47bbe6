use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tscns_application::use_cases::CheckDriftUseCase;
use tscns_domain::config::MonitorConfig;
use tscns_infrastructure::SystemTscns;
use tscns_jobs::{CalibrationJob, DriftMonitorJob, JobRunner};

/// Keep the clock calibrated in the background and report drift until
/// Ctrl-C or the optional deadline.
pub async fn run(
    clock: Arc<SystemTscns>,
    config: &MonitorConfig,
    duration_secs: Option<u64>,
) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();

    let calibration =
        CalibrationJob::new(clock.clone()).with_poll_interval_ms(config.calibrate_poll_ms);
    let drift_monitor = DriftMonitorJob::new(Arc::new(CheckDriftUseCase::new(clock)))
        .with_interval_ms(config.drift_report_ms);

    JobRunner::new()
        .with_calibration(calibration)
        .with_drift_monitor(drift_monitor)
        .with_shutdown_token(shutdown.clone())
        .start()
        .await;

    info!(started_at = %Utc::now(), "Watching clock, press Ctrl-C to stop");

    match duration_secs {
        Some(secs) => {
            tokio::select! {
                result = tokio::signal::ctrl_c() => result?,
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
            }
        }
        None => tokio::signal::ctrl_c().await?,
    }

    shutdown.cancel();
    tokio::task::yield_now().await;
    info!(stopped_at = %Utc::now(), "Watch stopped");
    Ok(())
}
