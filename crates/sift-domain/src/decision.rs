//! Decision module - the outcome of classifying one item

use crate::{Entry, Fingerprint};

/// Result of classifying an incoming item against the stored corpus
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// No exact or near match; a new entry was created
    Unique(Entry),

    /// The fingerprint is already stored; no entry was created
    ExactDuplicate(Entry),

    /// No exact match, but a stored entry is within the near-duplicate threshold
    NearDuplicate {
        /// The first matching entry in scan order
        entry: Entry,
        /// Similarity between the candidate and `entry` (0.0-1.0)
        similarity: f64,
    },

    /// Classified redundant, but the matching entry could not be read back
    ///
    /// Happens when an insert loses a uniqueness race and the winning entry
    /// is not visible on the re-read.
    RedundantNoEntry {
        /// Fingerprint of the candidate
        fingerprint: Fingerprint,
    },
}

impl Decision {
    /// Stable name for logs and output
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Unique(_) => "unique",
            Decision::ExactDuplicate(_) => "exact_duplicate",
            Decision::NearDuplicate { .. } => "near_duplicate",
            Decision::RedundantNoEntry { .. } => "redundant_no_entry",
        }
    }

    /// The entry this decision refers to, if any
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            Decision::Unique(entry) | Decision::ExactDuplicate(entry) => Some(entry),
            Decision::NearDuplicate { entry, .. } => Some(entry),
            Decision::RedundantNoEntry { .. } => None,
        }
    }

    /// Whether a new entry was created
    pub fn is_unique(&self) -> bool {
        matches!(self, Decision::Unique(_))
    }

    /// Whether the item was classified as redundant
    pub fn is_redundant(&self) -> bool {
        !self.is_unique()
    }

    /// Whether the item was flagged as a near-duplicate ("false positive" candidate)
    pub fn is_false_positive(&self) -> bool {
        matches!(self, Decision::NearDuplicate { .. })
    }

    /// Similarity recorded in the audit trail
    ///
    /// Exact matches score 1.0; unique items carry the best similarity seen
    /// during the scan.
    pub fn similarity_score(&self) -> f64 {
        match self {
            Decision::Unique(entry) => entry.similarity_score,
            Decision::ExactDuplicate(_) | Decision::RedundantNoEntry { .. } => 1.0,
            Decision::NearDuplicate { similarity, .. } => *similarity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataType, EntryId, NewEntry};

    fn entry(similarity: f64) -> Entry {
        NewEntry::new("hello world", DataType::Text, Fingerprint::new_unchecked("0".repeat(64)))
            .with_similarity(similarity)
            .into_entry(EntryId::new(), 1)
    }

    #[test]
    fn test_flags_per_variant() {
        let unique = Decision::Unique(entry(0.4));
        assert!(!unique.is_redundant());
        assert!(!unique.is_false_positive());
        assert_eq!(unique.similarity_score(), 0.4);

        let exact = Decision::ExactDuplicate(entry(0.0));
        assert!(exact.is_redundant());
        assert!(!exact.is_false_positive());
        assert_eq!(exact.similarity_score(), 1.0);

        let near = Decision::NearDuplicate { entry: entry(0.0), similarity: 0.9 };
        assert!(near.is_redundant());
        assert!(near.is_false_positive());
        assert_eq!(near.similarity_score(), 0.9);

        let orphan = Decision::RedundantNoEntry {
            fingerprint: Fingerprint::new_unchecked("1".repeat(64)),
        };
        assert!(orphan.is_redundant());
        assert!(orphan.entry().is_none());
        assert_eq!(orphan.kind(), "redundant_no_entry");
    }
}
