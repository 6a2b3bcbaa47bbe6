pub mod hardware;
pub mod system;

use tscns_application::services::Tscns;
use tscns_domain::{ClockConfig, DomainError};

pub use hardware::{SystemClock, TscCounter};

/// Fast clock over the hardware cycle counter and the realtime clock.
pub type SystemTscns = Tscns<TscCounter, SystemClock>;

/// Build a [`SystemTscns`] and run the warm-up calibration.
///
/// Blocks the calling thread for `config.init_calibrate_ns`.
pub fn system_tscns(config: ClockConfig) -> Result<SystemTscns, DomainError> {
    Tscns::bootstrap(TscCounter::new(), SystemClock::new(), config)
}

/// Build a [`SystemTscns`] from a known counter frequency.
pub fn system_tscns_with_frequency(
    config: ClockConfig,
    ghz: f64,
) -> Result<SystemTscns, DomainError> {
    let clock = Tscns::new(TscCounter::new(), SystemClock::new(), config)?;
    clock.init_with_frequency(ghz)?;
    Ok(clock)
}
