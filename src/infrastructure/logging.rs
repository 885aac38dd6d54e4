//! File-backed `tracing` setup.
//!
//! The terminal belongs to the UI, so log lines go to the configured file.
//! `RUST_LOG` takes precedence over the configured filter.

use super::config::RegistryConfig;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },
    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

fn build_filter(config: &RegistryConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_filter).map_err(|err| LoggingError::Filter {
        filter: config.log_filter.clone(),
        reason: err.to_string(),
    })
}

/// Installs the global subscriber, appending to `config.log_file`.
pub fn init_logging(config: &RegistryConfig) -> Result<(), LoggingError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|source| LoggingError::Open {
            path: config.log_file.clone(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| LoggingError::Install(err.to_string()))
}
