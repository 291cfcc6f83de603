//! Entry module - a uniquely stored data item

use crate::{DataType, Fingerprint};
use std::fmt;

/// Unique identifier for an entry based on UUIDv7
///
/// UUIDv7 keeps identifiers chronologically sortable, which matches the
/// insertion order the near-duplicate scan relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u128);

impl EntryId {
    /// Generate a new UUIDv7-based EntryId
    ///
    /// # Examples
    ///
    /// ```
    /// use sift_domain::EntryId;
    ///
    /// let id = EntryId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an EntryId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an EntryId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use sift_domain::EntryId;
    ///
    /// let id = EntryId::new();
    /// let parsed = EntryId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid entry id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A uniquely stored data item
///
/// Entries are only ever created for content that was classified as unique,
/// so `is_redundant` and `is_false_positive` are `false` on every entry the
/// engine creates. They are kept for schema compatibility and never change.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Unique identifier
    pub id: EntryId,

    /// The stored payload
    pub content: String,

    /// Declared type of the payload
    pub data_type: DataType,

    /// Content digest, unique across all entries
    pub fingerprint: Fingerprint,

    /// Similarity to the nearest stored entry seen at insertion time
    pub similarity_score: f64,

    /// Whether the classifier considered this item redundant
    pub is_redundant: bool,

    /// Whether the classifier flagged this item as a near-duplicate candidate
    pub is_false_positive: bool,

    /// Creation time (Unix milliseconds)
    pub created_at: u64,

    /// Last modification time (Unix milliseconds)
    pub updated_at: u64,
}

/// Input for creating an entry
///
/// The store assigns the id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    /// The payload
    pub content: String,

    /// Declared type
    pub data_type: DataType,

    /// Digest of `content`
    pub fingerprint: Fingerprint,

    /// Similarity to the nearest stored entry seen during the scan
    pub similarity_score: f64,
}

impl NewEntry {
    /// Create a new entry request with no similarity information
    pub fn new(content: impl Into<String>, data_type: DataType, fingerprint: Fingerprint) -> Self {
        Self {
            content: content.into(),
            data_type,
            fingerprint,
            similarity_score: 0.0,
        }
    }

    /// Set the similarity score observed during the scan
    pub fn with_similarity(mut self, similarity_score: f64) -> Self {
        self.similarity_score = similarity_score;
        self
    }

    /// Materialize into a stored entry with the given id and timestamp
    pub fn into_entry(self, id: EntryId, now: u64) -> Entry {
        Entry {
            id,
            content: self.content,
            data_type: self.data_type,
            fingerprint: self.fingerprint,
            similarity_score: self.similarity_score,
            is_redundant: false,
            is_false_positive: false,
            created_at: now,
            updated_at: now,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: EntryId ordering matches u128 ordering
        #[test]
        fn test_entry_id_ordering_property(a: u128, b: u128) {
            let id_a = EntryId::from_value(a);
            let id_b = EntryId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// Property: string form parses back to the same id
        #[test]
        fn test_entry_id_string_roundtrip(value: u128) {
            let id = EntryId::from_value(value);
            match EntryId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }
    }
}
