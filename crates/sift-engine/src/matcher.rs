//! Near-duplicate matching
//!
//! The classifier asks a [`NearDuplicateMatcher`] whether a candidate is close
//! enough to a stored entry to count as redundant. Two matchers exist:
//!
//! - [`EditDistanceMatcher`]: Levenshtein distance over Unicode scalar values
//!   (behind the `edit-distance` feature, on by default)
//! - [`ExactIgnoreCaseMatcher`]: degraded mode, equality after lowercasing
//!
//! [`select_matcher`] picks one at startup from [`DetectionConfig`].

use crate::config::{DetectionConfig, MatcherKind};
use std::fmt;

/// Result of comparing a candidate with a stored entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    /// Whether the pair counts as near-duplicate
    pub is_near: bool,

    /// Similarity in [0.0, 1.0]
    pub similarity: f64,
}

/// Decides whether two contents are near-duplicates
pub trait NearDuplicateMatcher: Send + Sync + fmt::Debug {
    /// Compare a candidate against an existing entry's content
    fn compare(&self, candidate: &str, existing: &str) -> MatchOutcome;

    /// Boolean shorthand for [`NearDuplicateMatcher::compare`]
    fn is_near(&self, candidate: &str, existing: &str) -> bool {
        self.compare(candidate, existing).is_near
    }

    /// Whether this matcher is the degraded fallback
    fn is_degraded(&self) -> bool {
        false
    }

    /// Short name for logs and output
    fn name(&self) -> &'static str;
}

/// Levenshtein distance between two strings, counted in Unicode scalar values
///
/// Two-row Wagner-Fischer.
#[cfg(feature = "edit-distance")]
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let (len1, len2) = (s1_chars.len(), s2_chars.len());
    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row: Vec<usize> = vec![0; len2 + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = usize::from(c1 != c2);
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}

/// Similarity derived from an edit distance: `1 - distance / max_len`
///
/// Two empty strings are identical (1.0).
pub fn similarity_from_distance(distance: usize, len1: usize, len2: usize) -> f64 {
    let max_len = len1.max(len2);
    if max_len == 0 {
        return 1.0;
    }
    (1.0 - distance as f64 / max_len as f64).clamp(0.0, 1.0)
}

/// Near iff the edit distance is below a fixed threshold
///
/// With a similarity floor set, the floor replaces the absolute threshold.
#[cfg(feature = "edit-distance")]
#[derive(Debug, Clone)]
pub struct EditDistanceMatcher {
    threshold: usize,
    min_similarity: Option<f64>,
}

#[cfg(feature = "edit-distance")]
impl EditDistanceMatcher {
    /// Default exclusive distance threshold
    pub const DEFAULT_THRESHOLD: usize = 3;

    /// Near iff `distance < threshold`
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            min_similarity: None,
        }
    }

    /// Near iff `similarity >= floor`
    pub fn with_min_similarity(floor: f64) -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            min_similarity: Some(floor),
        }
    }

    /// The exclusive distance threshold
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// The similarity floor, if one replaces the threshold
    pub fn min_similarity(&self) -> Option<f64> {
        self.min_similarity
    }
}

#[cfg(feature = "edit-distance")]
impl Default for EditDistanceMatcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

#[cfg(feature = "edit-distance")]
impl NearDuplicateMatcher for EditDistanceMatcher {
    fn compare(&self, candidate: &str, existing: &str) -> MatchOutcome {
        let distance = levenshtein_distance(candidate, existing);
        let similarity = similarity_from_distance(
            distance,
            candidate.chars().count(),
            existing.chars().count(),
        );
        let is_near = match self.min_similarity {
            Some(floor) => similarity >= floor,
            None => distance < self.threshold,
        };
        MatchOutcome { is_near, similarity }
    }

    fn name(&self) -> &'static str {
        "edit_distance"
    }
}

/// Degraded matcher: near iff equal after Unicode lowercasing
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactIgnoreCaseMatcher;

impl NearDuplicateMatcher for ExactIgnoreCaseMatcher {
    fn compare(&self, candidate: &str, existing: &str) -> MatchOutcome {
        let is_near = candidate.to_lowercase() == existing.to_lowercase();
        MatchOutcome {
            is_near,
            similarity: if is_near { 1.0 } else { 0.0 },
        }
    }

    fn is_degraded(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "exact_ignore_case"
    }
}

/// Choose the matcher for a detection configuration
///
/// Falls back to [`ExactIgnoreCaseMatcher`] when the configuration asks for
/// it or the `edit-distance` feature is compiled out. The fallback is
/// announced with a single warning.
pub fn select_matcher(config: &DetectionConfig) -> Box<dyn NearDuplicateMatcher> {
    match config.matcher {
        #[cfg(feature = "edit-distance")]
        MatcherKind::EditDistance => {
            let matcher = match config.min_similarity {
                Some(floor) => EditDistanceMatcher::with_min_similarity(floor),
                None => EditDistanceMatcher::new(config.edit_distance_threshold),
            };
            tracing::debug!(
                threshold = matcher.threshold(),
                min_similarity = ?matcher.min_similarity(),
                "Using edit-distance matcher"
            );
            Box::new(matcher)
        }
        #[cfg(not(feature = "edit-distance"))]
        MatcherKind::EditDistance => {
            tracing::warn!(
                "Edit-distance matching not compiled in; near-duplicate detection degraded to case-insensitive equality"
            );
            Box::new(ExactIgnoreCaseMatcher)
        }
        MatcherKind::ExactIgnoreCase => {
            tracing::warn!(
                "Near-duplicate detection degraded to case-insensitive equality by configuration"
            );
            Box::new(ExactIgnoreCaseMatcher)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_case_matcher() {
        let matcher = ExactIgnoreCaseMatcher;
        assert!(matcher.is_near("Hello World", "hello world"));
        assert!(!matcher.is_near("hello world", "hello worlb"));
        assert!(matcher.is_degraded());
        assert_eq!(matcher.compare("A", "a").similarity, 1.0);
        assert_eq!(matcher.compare("A", "b").similarity, 0.0);
    }

    #[test]
    fn test_ignore_case_matcher_unicode() {
        assert!(ExactIgnoreCaseMatcher.is_near("ÉCOLE", "école"));
    }

    #[test]
    fn test_similarity_from_distance() {
        assert_eq!(similarity_from_distance(0, 0, 0), 1.0);
        assert_eq!(similarity_from_distance(1, 4, 4), 0.75);
        assert_eq!(similarity_from_distance(5, 5, 3), 0.0);
    }

    #[test]
    fn test_select_degraded_by_config() {
        let config = DetectionConfig {
            matcher: MatcherKind::ExactIgnoreCase,
            ..DetectionConfig::default()
        };
        let matcher = select_matcher(&config);
        assert!(matcher.is_degraded());
        assert_eq!(matcher.name(), "exact_ignore_case");
    }

    #[cfg(feature = "edit-distance")]
    mod edit_distance {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn test_levenshtein_basics() {
            assert_eq!(levenshtein_distance("", ""), 0);
            assert_eq!(levenshtein_distance("abc", ""), 3);
            assert_eq!(levenshtein_distance("", "abc"), 3);
            assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
            assert_eq!(levenshtein_distance("hello world", "hello worlb"), 1);
            assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
        }

        #[test]
        fn test_levenshtein_counts_scalar_values() {
            assert_eq!(levenshtein_distance("café", "cafe"), 1);
            assert_eq!(levenshtein_distance("日本語", "日本"), 1);
        }

        #[test]
        fn test_threshold_is_exclusive() {
            let matcher = EditDistanceMatcher::default();
            // distance 2
            assert!(matcher.is_near("abcdef", "abcdXY"));
            // distance 3
            assert!(!matcher.is_near("abcdef", "abcXYZ"));
        }

        #[test]
        fn test_threshold_independent_of_length() {
            let matcher = EditDistanceMatcher::default();
            assert!(matcher.is_near("ab", "xy"));
            assert!(!matcher.is_near("a", "xyz"));
        }

        #[test]
        fn test_min_similarity_replaces_threshold() {
            let matcher = EditDistanceMatcher::with_min_similarity(0.75);
            // distance 2 over 4 chars: similarity 0.5
            assert!(!matcher.is_near("abcd", "abXY"));
            // distance 4 over 20 chars: similarity 0.8
            assert!(matcher.is_near("aaaaaaaaaaaaaaaaaaaa", "aaaaaaaaaaaaaaaabbbb"));
            // distance 1 over 4 chars: exactly on the floor
            assert!(matcher.is_near("abcd", "abcX"));
        }

        #[test]
        fn test_case_difference_counts_as_edits() {
            let matcher = EditDistanceMatcher::default();
            assert!(matcher.is_near("Hello", "hello"));
            assert!(!matcher.is_near("HELLO", "hello"));
        }

        #[test]
        fn test_select_edit_distance_by_default() {
            let matcher = select_matcher(&DetectionConfig::default());
            assert!(!matcher.is_degraded());
            assert_eq!(matcher.name(), "edit_distance");
            assert!(matcher.is_near("hello world", "hello worlb"));
        }

        proptest! {
            #[test]
            fn prop_distance_is_symmetric(a in "\\PC{0,16}", b in "\\PC{0,16}") {
                prop_assert_eq!(levenshtein_distance(&a, &b), levenshtein_distance(&b, &a));
            }

            #[test]
            fn prop_distance_to_self_is_zero(a in "\\PC{0,32}") {
                prop_assert_eq!(levenshtein_distance(&a, &a), 0);
            }

            #[test]
            fn prop_distance_bounded_by_longer_length(a in "\\PC{0,16}", b in "\\PC{0,16}") {
                let d = levenshtein_distance(&a, &b);
                let (la, lb) = (a.chars().count(), b.chars().count());
                prop_assert!(d <= la.max(lb));
                prop_assert!(d >= la.abs_diff(lb));
            }

            #[test]
            fn prop_similarity_in_unit_range(a in "\\PC{0,16}", b in "\\PC{0,16}") {
                let outcome = EditDistanceMatcher::default().compare(&a, &b);
                prop_assert!((0.0..=1.0).contains(&outcome.similarity));
            }
        }
    }
}
