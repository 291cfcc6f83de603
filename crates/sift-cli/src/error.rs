//! Errors surfaced by the `sift` binary.
//!
//! Library errors convert in through `From`; `main` prints the message and
//! exits with status 1.

use thiserror::Error;

/// Result alias used by every command.
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Bad or unreadable settings (file, env var or flag)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    EngineConfig(#[from] sift_engine::ConfigError),

    /// The entry database could not be opened or queried
    #[error("Database error: {0}")]
    Store(#[from] sift_store::StoreError),

    #[error(transparent)]
    Classifier(#[from] sift_engine::ClassifierError),

    /// Item refused by the validation gate
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Batch file or JSON output
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A blocking classification worker panicked or was cancelled
    #[error("Worker failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
