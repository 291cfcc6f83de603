//! Error types for the classification engine

use thiserror::Error;

/// Errors that can occur during classification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Entry store failure (database error, timeout, corrupt row)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClassifierError {
    /// Wrap any displayable store error
    pub(crate) fn storage(e: impl std::fmt::Display) -> Self {
        ClassifierError::Storage(e.to_string())
    }

    /// Whether retrying the same item may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClassifierError::Storage(_))
    }
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A value is out of bounds
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// TOML could not be parsed or serialized
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}
