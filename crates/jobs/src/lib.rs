pub mod calibration;
pub mod drift_monitor;
pub mod runner;

pub use calibration::CalibrationJob;
pub use drift_monitor::DriftMonitorJob;
pub use runner::JobRunner;
