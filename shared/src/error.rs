//! Domain errors raised by pure validation and identifier generation

use thiserror::Error;

/// Errors produced by domain rules before any storage is touched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// The four-digit sequence space for a prefix is used up
    #[error("Sequence space exhausted for prefix {prefix}")]
    Capacity { prefix: String },
}

impl DomainError {
    pub fn validation(field: &str, message: &str) -> Self {
        DomainError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
