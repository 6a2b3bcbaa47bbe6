//! TSCNS Domain Layer
pub mod calibration;
pub mod clock_parameters;
pub mod clocksource;
pub mod config;
pub mod errors;
pub mod report;
pub mod sample;

pub use calibration::{CalibrationOutcome, CalibrationReport, CalibrationState, SkipReason};
pub use clock_parameters::ClockParameters;
pub use config::{ClockConfig, CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use report::{DriftSample, LatencyReport};
pub use sample::Anchor;

pub const NS_PER_SEC: i64 = 1_000_000_000;
