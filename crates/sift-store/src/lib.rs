//! Sift Storage Layer
//!
//! Implements the entry store, audit sink and metric sink traits from
//! `sift-domain`.
//!
//! # Backends
//!
//! - [`SqliteStore`]: durable storage; fingerprint uniqueness enforced by a
//!   `UNIQUE` constraint, every call bounded by a timeout
//! - [`InMemoryStore`]: `RwLock`-guarded collections for tests and dry runs
//!
//! # Examples
//!
//! ```no_run
//! use sift_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for entry operations
//! ```

#![warn(missing_docs)]

mod connection;
mod error;
#[allow(missing_docs)]
mod memory;
mod sqlite;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use sift_domain::{OperationType, ProcessingLogRecord};

/// Aggregate view of the classification audit trail
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogStats {
    /// Classification attempts recorded
    pub total: usize,

    /// Attempts that ended in an error
    pub failed: usize,

    /// Successful attempts classified as redundant
    pub redundant: usize,

    /// Successful attempts flagged as near-duplicates
    pub false_positives: usize,

    /// Mean processing time across all attempts
    pub avg_processing_time_ms: f64,
}

impl LogStats {
    /// Compute stats from in-memory records
    pub fn from_records(records: &[ProcessingLogRecord]) -> Self {
        let classify: Vec<_> = records
            .iter()
            .filter(|r| r.operation_type == OperationType::Classify)
            .collect();

        let total = classify.len();
        let avg_processing_time_ms = if total == 0 {
            0.0
        } else {
            classify.iter().map(|r| r.processing_time_ms as f64).sum::<f64>() / total as f64
        };

        Self {
            total,
            failed: classify.iter().filter(|r| !r.success).count(),
            redundant: classify.iter().filter(|r| r.success && r.is_redundant).count(),
            false_positives: classify
                .iter()
                .filter(|r| r.success && r.is_false_positive)
                .count(),
            avg_processing_time_ms,
        }
    }

    /// Share of successful attempts that were redundant
    pub fn redundancy_rate(&self) -> f64 {
        let successful = self.total.saturating_sub(self.failed);
        if successful == 0 {
            0.0
        } else {
            self.redundant as f64 / successful as f64
        }
    }
}
