//! Gatekeeper error types

use thiserror::Error;

/// Errors that can occur configuring the gatekeeper
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Reasons an item is rejected before classification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Content is empty or whitespace only
    #[error("Data content cannot be empty")]
    EmptyContent,

    /// Content exceeds the configured maximum length
    #[error("Data content exceeds maximum length of {max} characters (got {actual})")]
    ContentTooLong {
        /// Configured maximum
        max: usize,
        /// Actual length in characters
        actual: usize,
    },

    /// Data type is not one of the accepted kinds
    #[error("Invalid data type '{0}'. Must be one of: text, number, mixed, boolean, date, datetime")]
    InvalidDataType(String),

    /// Content does not parse as a number
    #[error("Data content is not numeric")]
    NotNumeric,

    /// Content is not a recognized boolean token
    #[error("Data content is not boolean")]
    NotBoolean,

    /// Content does not match an accepted date shape
    #[error("Data content is not a valid date format")]
    NotDate,
}
