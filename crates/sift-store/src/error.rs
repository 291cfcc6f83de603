//! Storage error types

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A storage call did not complete within its deadline
    #[error("Storage timeout after {0}ms")]
    Timeout(u64),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The backend is unavailable (used by the in-memory store after a poisoned lock)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
