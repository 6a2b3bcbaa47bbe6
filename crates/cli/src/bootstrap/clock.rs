use std::sync::Arc;
use tracing::{error, info};
use tscns_domain::Config;
use tscns_infrastructure::system::pin_current_thread;
use tscns_infrastructure::{system_tscns, system_tscns_with_frequency, SystemTscns, TscCounter};

/// Pin if configured, then bootstrap the clock on the calling thread.
pub fn build_clock(config: &Config, ghz: Option<f64>) -> anyhow::Result<Arc<SystemTscns>> {
    if let Some(cpu) = config.monitor.cpu {
        pin_current_thread(cpu).map_err(|e| {
            error!(cpu, error = %e, "Failed to pin thread");
            anyhow::anyhow!(e)
        })?;
        info!(cpu, "Bound to CPU");
    }

    if !TscCounter::is_hardware() {
        info!("No hardware cycle counter on this target, using the system clock");
    }

    let clock = match ghz {
        Some(ghz) => system_tscns_with_frequency(config.clock.clone(), ghz)?,
        None => {
            info!(
                warmup_ms = config.clock.init_calibrate_ns / 1_000_000,
                "Measuring counter frequency"
            );
            system_tscns(config.clock.clone())?
        }
    };

    info!(tsc_ghz = clock.frequency_ghz(), "Clock ready");
    Ok(Arc::new(clock))
}
