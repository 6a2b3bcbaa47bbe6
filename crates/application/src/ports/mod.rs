mod calibration_port;
mod clock_source;
mod cycle_counter;
mod drift_probe_port;
mod wall_clock;

pub use calibration_port::CalibrationPort;
pub use clock_source::ClockSource;
pub use cycle_counter::CycleCounter;
pub use drift_probe_port::DriftProbePort;
pub use wall_clock::WallClock;

// Re-export for convenience
pub use tscns_domain::{CalibrationOutcome, DriftSample};
