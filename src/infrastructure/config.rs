//! Configuration loading.
//!
//! Every field has a default, so running without a config file is fine.
//! A file, when given, is TOML and may override any subset of fields.

use crate::application::UiTimings;
use crate::domain::ConfirmationDelays;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub registration_delay_ms: u64,
    pub transfer_delay_ms: u64,
    pub submission_delay_ms: u64,
    pub tick_rate_ms: u64,
    pub toast_duration_ms: u64,
    pub seed_demo_data: bool,
    pub log_file: PathBuf,
    pub log_filter: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registration_delay_ms: 3000,
            transfer_delay_ms: 4000,
            submission_delay_ms: 1000,
            tick_rate_ms: 100,
            toast_duration_ms: 5000,
            seed_demo_data: true,
            log_file: PathBuf::from("land-registry.log"),
            log_filter: "land_registry=info".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl RegistryConfig {
    /// Loads `path` if given, otherwise returns the defaults. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_rate_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.toast_duration_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "toast_duration_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_filter",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn confirmation_delays(&self) -> ConfirmationDelays {
        ConfirmationDelays {
            registration: Duration::from_millis(self.registration_delay_ms),
            transfer: Duration::from_millis(self.transfer_delay_ms),
        }
    }

    pub fn ui_timings(&self) -> UiTimings {
        UiTimings {
            submission_delay: Duration::from_millis(self.submission_delay_ms),
            toast_duration: Duration::from_millis(self.toast_duration_ms),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}
