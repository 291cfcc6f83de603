//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the classification engine and
//! its collaborators. Implementations live in other crates.

use crate::{DataType, Entry, EntryId, Fingerprint, Metric, NewEntry, ProcessingLogRecord};
use std::fmt;
use std::sync::Arc;

/// Failure of [`EntryStore::insert`]
#[derive(Debug)]
pub enum InsertError<E> {
    /// An entry with this fingerprint already exists
    ///
    /// Raised when a concurrent insert won the race. Callers recover by
    /// re-reading the existing entry.
    DuplicateFingerprint(Fingerprint),

    /// The underlying storage failed
    Storage(E),
}

impl<E: fmt::Display> fmt::Display for InsertError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateFingerprint(fp) => {
                write!(f, "Duplicate fingerprint: {}", fp.short())
            }
            InsertError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl<E> std::error::Error for InsertError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InsertError::DuplicateFingerprint(_) => None,
            InsertError::Storage(e) => Some(e),
        }
    }
}

impl<E> From<E> for InsertError<E> {
    fn from(e: E) -> Self {
        InsertError::Storage(e)
    }
}

/// Persistence contract for unique entries, keyed by fingerprint
///
/// Implemented by the infrastructure layer (sift-store). Methods take `&self`
/// so a single store can be shared across threads; implementations use
/// interior mutability and must keep `insert` atomic with respect to the
/// fingerprint uniqueness invariant.
pub trait EntryStore: Send + Sync {
    /// Error type for store operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a new entry
    ///
    /// Fails with [`InsertError::DuplicateFingerprint`] if the fingerprint is
    /// already stored. A failed insert leaves no partial entry behind.
    fn insert(&self, entry: NewEntry) -> Result<Entry, InsertError<Self::Error>>;

    /// Exact-match retrieval by fingerprint
    fn lookup_by_fingerprint(&self, fingerprint: &Fingerprint)
        -> Result<Option<Entry>, Self::Error>;

    /// Retrieval by id
    fn get(&self, id: EntryId) -> Result<Option<Entry>, Self::Error>;

    /// The full corpus in insertion order
    ///
    /// Cost is proportional to corpus size. Prefer [`EntryStore::list_range`]
    /// for scans.
    fn list_all(&self) -> Result<Vec<Entry>, Self::Error>;

    /// One page of the corpus in insertion order
    fn list_range(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, Self::Error>;

    /// Entries of one data type in insertion order
    fn list_by_data_type(
        &self,
        data_type: DataType,
        limit: Option<usize>,
    ) -> Result<Vec<Entry>, Self::Error>;

    /// Number of stored entries
    fn count(&self) -> Result<usize, Self::Error>;
}

/// Append-only destination for processing log records
pub trait AuditSink: Send + Sync {
    /// Error type for append failures
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append one record
    fn append(&self, record: &ProcessingLogRecord) -> Result<(), Self::Error>;
}

/// Destination for metric observations
pub trait MetricSink: Send + Sync {
    /// Error type for write failures
    type Error: std::error::Error + Send + Sync + 'static;

    /// Record one observation
    fn record_metric(&self, metric: &Metric) -> Result<(), Self::Error>;
}

/// Pre-screens items before they reach the classifier
///
/// Implemented by sift-gatekeeper. The classifier assumes every item it sees
/// has passed this gate and does not re-validate.
pub trait ValidationGate: Send + Sync {
    /// Reason an item was rejected
    type Rejection: fmt::Display;

    /// Check content against its declared type, returning the parsed type
    fn validate(&self, content: &str, data_type: &str) -> Result<DataType, Self::Rejection>;
}

// Shared handles delegate to the underlying implementation

impl<T: EntryStore + ?Sized> EntryStore for Arc<T> {
    type Error = T::Error;

    fn insert(&self, entry: NewEntry) -> Result<Entry, InsertError<Self::Error>> {
        (**self).insert(entry)
    }

    fn lookup_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<Entry>, Self::Error> {
        (**self).lookup_by_fingerprint(fingerprint)
    }

    fn get(&self, id: EntryId) -> Result<Option<Entry>, Self::Error> {
        (**self).get(id)
    }

    fn list_all(&self) -> Result<Vec<Entry>, Self::Error> {
        (**self).list_all()
    }

    fn list_range(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, Self::Error> {
        (**self).list_range(offset, limit)
    }

    fn list_by_data_type(
        &self,
        data_type: DataType,
        limit: Option<usize>,
    ) -> Result<Vec<Entry>, Self::Error> {
        (**self).list_by_data_type(data_type, limit)
    }

    fn count(&self) -> Result<usize, Self::Error> {
        (**self).count()
    }
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    type Error = T::Error;

    fn append(&self, record: &ProcessingLogRecord) -> Result<(), Self::Error> {
        (**self).append(record)
    }
}

impl<T: MetricSink + ?Sized> MetricSink for Arc<T> {
    type Error = T::Error;

    fn record_metric(&self, metric: &Metric) -> Result<(), Self::Error> {
        (**self).record_metric(metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl std::error::Error for Boom {}

    #[test]
    fn test_insert_error_display() {
        let dup: InsertError<Boom> =
            InsertError::DuplicateFingerprint(Fingerprint::new_unchecked("ab".repeat(32)));
        assert!(dup.to_string().starts_with("Duplicate fingerprint: abababababab"));

        let storage: InsertError<Boom> = Boom.into();
        assert_eq!(storage.to_string(), "boom");
        assert!(std::error::Error::source(&storage).is_some());
    }
}
