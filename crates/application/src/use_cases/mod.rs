pub mod check_drift;
pub mod measure_latency;

pub use check_drift::CheckDriftUseCase;
pub use measure_latency::MeasureLatencyUseCase;
