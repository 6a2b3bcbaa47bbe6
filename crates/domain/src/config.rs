pub mod clock;
pub mod errors;
pub mod logging;
pub mod monitor;
pub mod root;

pub use clock::{ClockConfig, MAX_SYNC_TRIALS};
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use monitor::MonitorConfig;
pub use root::{CliOverrides, Config};
