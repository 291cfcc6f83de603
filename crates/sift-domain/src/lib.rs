//! Sift Domain Layer
//!
//! This crate contains the core vocabulary of the redundancy-detection engine.
//! It has a single external dependency (`uuid`) and defines the value objects
//! and trait interfaces that every other crate depends upon.
//!
//! ## Key Concepts
//!
//! - **Entry**: A uniquely stored data item, keyed by its fingerprint
//! - **Fingerprint**: Fixed-length content digest used as the exact-duplicate key
//! - **Decision**: The outcome of classifying one incoming item
//! - **ProcessingLogRecord**: Append-only audit row, one per classification attempt
//! - **Metric**: Named numeric observation for trend analysis
//!
//! ## Architecture
//!
//! - Pure data types and trait definitions only
//! - Storage, validation, and classification live in other crates
//! - [`traits`] defines the seams between the engine and its collaborators

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod data_type;
pub mod decision;
pub mod entry;
pub mod fingerprint;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use data_type::DataType;
pub use decision::Decision;
pub use entry::{Entry, EntryId, NewEntry};
pub use fingerprint::Fingerprint;
pub use record::{Metric, OperationType, ProcessingLogRecord};

/// Current time in milliseconds since the Unix epoch.
///
/// Falls back to `0` if the system clock reads earlier than the epoch.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
