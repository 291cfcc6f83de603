//! Redundancy classification
//!
//! Decides whether an incoming item is unique, an exact duplicate or a near
//! duplicate of the stored corpus, stores it when unique, and writes exactly
//! one audit record per call.

use crate::audit::{AuditEvent, AuditLogger};
use crate::config::DetectionConfig;
use crate::error::ClassifierError;
use crate::fingerprint::Fingerprinter;
use crate::matcher::{select_matcher, NearDuplicateMatcher};
use crate::metrics::ClassifierMetrics;
use sift_domain::traits::{AuditSink, EntryStore, InsertError};
use sift_domain::{DataType, Decision, Entry, Fingerprint, NewEntry};
use std::sync::Mutex;
use std::time::Instant;

/// Outcome of scanning the corpus for a candidate
#[derive(Debug)]
enum ScanResult {
    /// An entry with the candidate's fingerprint appeared since the lookup
    Exact(Entry),
    /// First near-duplicate in insertion order
    Near { entry: Entry, similarity: f64 },
    /// Nothing matched; best similarity seen
    NoMatch { best_similarity: f64 },
}

/// Classifies items against the stored corpus
///
/// Safe to share across threads: the store provides its own locking and
/// the metrics live behind a mutex.
pub struct RedundancyClassifier<S, A> {
    store: S,
    audit: AuditLogger<A>,
    matcher: Box<dyn NearDuplicateMatcher>,
    fingerprinter: Fingerprinter,
    scan_batch_size: usize,
    metrics: Mutex<ClassifierMetrics>,
}

impl<S, A> RedundancyClassifier<S, A>
where
    S: EntryStore,
    A: AuditSink,
{
    /// Create a classifier from a detection configuration
    ///
    /// The matcher is selected here, once.
    pub fn new(store: S, audit_sink: A, config: &DetectionConfig) -> Self {
        Self::with_matcher(
            store,
            audit_sink,
            select_matcher(config),
            Fingerprinter::new(config.fingerprint),
            config.scan_batch_size,
        )
    }

    /// Create a classifier with an explicit matcher
    pub fn with_matcher(
        store: S,
        audit_sink: A,
        matcher: Box<dyn NearDuplicateMatcher>,
        fingerprinter: Fingerprinter,
        scan_batch_size: usize,
    ) -> Self {
        Self {
            store,
            audit: AuditLogger::new(audit_sink),
            matcher,
            fingerprinter,
            scan_batch_size: scan_batch_size.max(1),
            metrics: Mutex::new(ClassifierMetrics::new()),
        }
    }

    /// Classify one item
    ///
    /// The item is assumed to have passed the validation gate. Exactly one
    /// audit record is written, whether classification succeeds or fails.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Storage`] if the store fails. No entry is
    /// created in that case.
    pub fn classify(&self, content: &str, data_type: DataType) -> Result<Decision, ClassifierError> {
        let started = Instant::now();
        let fingerprint = self.fingerprinter.fingerprint(content);

        let result = self.decide(content, data_type, &fingerprint);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(decision) => {
                self.audit.record(AuditEvent::classified(
                    content,
                    data_type,
                    &fingerprint,
                    decision,
                    elapsed_ms,
                ));
                self.update_metrics(|m| m.record_decision(decision, data_type, elapsed_ms));
                tracing::debug!(
                    fingerprint = %fingerprint.short(),
                    decision = decision.kind(),
                    elapsed_ms,
                    "Classified item"
                );
            }
            Err(e) => {
                self.audit.record(AuditEvent::failed(
                    content,
                    data_type,
                    &fingerprint,
                    &e.to_string(),
                    elapsed_ms,
                ));
                self.update_metrics(|m| m.record_failure(elapsed_ms));
                tracing::warn!(
                    fingerprint = %fingerprint.short(),
                    error = %e,
                    "Classification failed"
                );
            }
        }

        result
    }

    fn decide(
        &self,
        content: &str,
        data_type: DataType,
        fingerprint: &Fingerprint,
    ) -> Result<Decision, ClassifierError> {
        // 1. Exact match by fingerprint
        if let Some(existing) = self
            .store
            .lookup_by_fingerprint(fingerprint)
            .map_err(ClassifierError::storage)?
        {
            return Ok(Decision::ExactDuplicate(existing));
        }

        // 2. Near-duplicate scan
        let best_similarity = match self.scan_corpus(content, fingerprint)? {
            ScanResult::Exact(entry) => return Ok(Decision::ExactDuplicate(entry)),
            ScanResult::Near { entry, similarity } => {
                return Ok(Decision::NearDuplicate { entry, similarity })
            }
            ScanResult::NoMatch { best_similarity } => best_similarity,
        };

        // 3. Store as unique
        let new_entry = NewEntry::new(content, data_type, fingerprint.clone())
            .with_similarity(best_similarity);
        match self.store.insert(new_entry) {
            Ok(entry) => Ok(Decision::Unique(entry)),
            Err(InsertError::DuplicateFingerprint(_)) => {
                tracing::debug!(
                    fingerprint = %fingerprint.short(),
                    "Lost insert race, re-reading winner"
                );
                let winner = self
                    .store
                    .lookup_by_fingerprint(fingerprint)
                    .map_err(ClassifierError::storage)?;
                Ok(match winner {
                    Some(entry) => Decision::ExactDuplicate(entry),
                    None => Decision::RedundantNoEntry {
                        fingerprint: fingerprint.clone(),
                    },
                })
            }
            Err(InsertError::Storage(e)) => Err(ClassifierError::storage(e)),
        }
    }

    /// Walk the corpus in insertion order, one page at a time
    ///
    /// The scan is not isolated from concurrent inserts: an entry added while
    /// it runs may or may not be seen.
    fn scan_corpus(
        &self,
        content: &str,
        fingerprint: &Fingerprint,
    ) -> Result<ScanResult, ClassifierError> {
        let mut best_similarity: f64 = 0.0;
        let mut offset = 0;

        loop {
            let page = self
                .store
                .list_range(offset, self.scan_batch_size)
                .map_err(ClassifierError::storage)?;

            for entry in &page {
                if entry.fingerprint == *fingerprint {
                    return Ok(ScanResult::Exact(entry.clone()));
                }
                let outcome = self.matcher.compare(content, &entry.content);
                if outcome.is_near {
                    return Ok(ScanResult::Near {
                        entry: entry.clone(),
                        similarity: outcome.similarity,
                    });
                }
                best_similarity = best_similarity.max(outcome.similarity);
            }

            if page.len() < self.scan_batch_size {
                break;
            }
            offset += page.len();
        }

        Ok(ScanResult::NoMatch { best_similarity })
    }

    fn update_metrics(&self, update: impl FnOnce(&mut ClassifierMetrics)) {
        let mut metrics = self
            .metrics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        update(&mut metrics);
    }

    /// Snapshot of the collected metrics
    pub fn metrics(&self) -> ClassifierMetrics {
        let mut snapshot = self
            .metrics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        snapshot.audit_failures = self.audit.failures();
        snapshot
    }

    /// The active matcher
    pub fn matcher(&self) -> &dyn NearDuplicateMatcher {
        self.matcher.as_ref()
    }

    /// Whether near-duplicate detection runs in degraded mode
    pub fn is_degraded(&self) -> bool {
        self.matcher.is_degraded()
    }

    /// The fingerprinter in use
    pub fn fingerprinter(&self) -> &Fingerprinter {
        &self.fingerprinter
    }

    /// The entry store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The audit logger
    pub fn audit(&self) -> &AuditLogger<A> {
        &self.audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::ExactIgnoreCaseMatcher;
    use sift_store::InMemoryStore;
    use std::sync::Arc;

    fn classifier(page: usize) -> RedundancyClassifier<Arc<InMemoryStore>, Arc<InMemoryStore>> {
        let store = Arc::new(InMemoryStore::new());
        let config = DetectionConfig {
            scan_batch_size: page,
            ..DetectionConfig::default()
        };
        RedundancyClassifier::new(Arc::clone(&store), store, &config)
    }

    #[cfg(feature = "edit-distance")]
    #[test]
    fn test_scan_crosses_page_boundaries() {
        let classifier = classifier(2);
        for content in ["alpha one", "bravo two", "charlie three", "delta four", "echo five"] {
            assert!(classifier.classify(content, DataType::Text).unwrap().is_unique());
        }

        // Near match to the last entry, which sits on the third page
        let decision = classifier.classify("echo fivx", DataType::Text).unwrap();
        match decision {
            Decision::NearDuplicate { entry, .. } => assert_eq!(entry.content, "echo five"),
            other => panic!("Expected NearDuplicate, got {:?}", other),
        }
    }

    #[cfg(feature = "edit-distance")]
    #[test]
    fn test_first_near_match_in_insertion_order_wins() {
        let classifier = classifier(10);
        assert!(classifier.classify("xxaaaa", DataType::Text).unwrap().is_unique());
        assert!(classifier.classify("aaaayy", DataType::Text).unwrap().is_unique());

        // Distance 2 to both stored entries; the older one wins
        let decision = classifier.classify("xaaaay", DataType::Text).unwrap();
        assert!(decision.is_false_positive());
        assert_eq!(decision.entry().map(|e| e.content.as_str()), Some("xxaaaa"));
    }

    #[cfg(feature = "edit-distance")]
    #[test]
    fn test_unique_entry_carries_best_similarity() {
        let classifier = classifier(10);
        classifier.classify("aaaaaaaaaa", DataType::Text).unwrap();

        // Distance 5 over 10 chars
        let decision = classifier.classify("aaaaabbbbb", DataType::Text).unwrap();
        assert!(decision.is_unique());
        assert!((decision.similarity_score() - 0.5).abs() < 1e-9);
    }

    #[cfg(feature = "edit-distance")]
    #[test]
    fn test_metrics_track_decisions() {
        let classifier = classifier(10);
        classifier.classify("hello world", DataType::Text).unwrap();
        classifier.classify("hello world", DataType::Text).unwrap();
        classifier.classify("hello worlb", DataType::Text).unwrap();

        let metrics = classifier.metrics();
        assert_eq!(metrics.unique, 1);
        assert_eq!(metrics.exact_duplicates, 1);
        assert_eq!(metrics.near_duplicates, 1);
        assert_eq!(metrics.audit_failures, 0);
    }

    #[test]
    fn test_explicit_degraded_matcher() {
        let store = Arc::new(InMemoryStore::new());
        let classifier = RedundancyClassifier::with_matcher(
            Arc::clone(&store),
            store,
            Box::new(ExactIgnoreCaseMatcher),
            Fingerprinter::default(),
            100,
        );
        assert!(classifier.is_degraded());
        assert_eq!(classifier.matcher().name(), "exact_ignore_case");
    }
}
