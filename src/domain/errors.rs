use thiserror::Error;

/// Rejections raised while turning raw form input into a registration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be a number, got '{input}'")]
    NotANumber { field: &'static str, input: String },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}

pub type DomainResult<T> = Result<T, DomainError>;
