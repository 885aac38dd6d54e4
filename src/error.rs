use crate::infrastructure::{ConfigError, ExportError, LoggingError};

/// Errors that can stop the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type AppResult<T> = Result<T, AppError>;
