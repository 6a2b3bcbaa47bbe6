use serde::{Deserialize, Serialize};

use super::clock::ClockConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::monitor::MonitorConfig;

const LOCAL_CONFIG_PATH: &str = "tscns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/tscns/config.toml";

/// Main configuration structure for TSCNS
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Calibration settings
    #[serde(default)]
    pub clock: ClockConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Background job settings
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. tscns.toml in current directory
    /// 3. /etc/tscns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::get_config_path() {
                Some(found) => Self::from_file(&found)?,
                None => Self::default(),
            },
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(ns) = overrides.init_calibrate_ns {
            self.clock.init_calibrate_ns = ns;
        }
        if let Some(ns) = overrides.calibrate_interval_ns {
            self.clock.calibrate_interval_ns = ns;
        }
        if let Some(cpu) = overrides.cpu {
            self.monitor.cpu = Some(cpu);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clock.validate()?;

        if self.monitor.calibrate_poll_ms == 0 {
            return Err(ConfigError::Validation(
                "calibrate_poll_ms cannot be 0".to_string(),
            ));
        }
        if self.monitor.drift_report_ms == 0 {
            return Err(ConfigError::Validation(
                "drift_report_ms cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Get the path to the configuration file that `load` would pick up
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub init_calibrate_ns: Option<i64>,
    pub calibrate_interval_ns: Option<i64>,
    pub cpu: Option<usize>,
    pub log_level: Option<String>,
}
