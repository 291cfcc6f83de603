//! Metrics collection for classification

use sift_domain::{DataType, Decision};
use std::collections::HashMap;

/// Counters collected by the classifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifierMetrics {
    /// Items stored as new entries
    pub unique: usize,

    /// Items whose fingerprint was already stored
    pub exact_duplicates: usize,

    /// Items within the near-duplicate threshold of a stored entry
    pub near_duplicates: usize,

    /// Redundant items whose matching entry could not be re-read
    pub redundant_no_entry: usize,

    /// Classifications that ended in a storage error
    pub failures: usize,

    /// Audit records the sink rejected
    pub audit_failures: u64,

    /// Classifications per data type
    pub by_data_type: HashMap<DataType, usize>,

    /// Accumulated processing time in milliseconds
    pub total_processing_ms: u64,
}

impl ClassifierMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed classification
    pub fn record_decision(&mut self, decision: &Decision, data_type: DataType, elapsed_ms: u64) {
        match decision {
            Decision::Unique(_) => self.unique += 1,
            Decision::ExactDuplicate(_) => self.exact_duplicates += 1,
            Decision::NearDuplicate { .. } => self.near_duplicates += 1,
            Decision::RedundantNoEntry { .. } => self.redundant_no_entry += 1,
        }
        *self.by_data_type.entry(data_type).or_insert(0) += 1;
        self.total_processing_ms += elapsed_ms;
    }

    /// Record a failed classification
    pub fn record_failure(&mut self, elapsed_ms: u64) {
        self.failures += 1;
        self.total_processing_ms += elapsed_ms;
    }

    /// Successful classifications
    pub fn total_classified(&self) -> usize {
        self.unique + self.total_redundant()
    }

    /// Classifications judged redundant
    pub fn total_redundant(&self) -> usize {
        self.exact_duplicates + self.near_duplicates + self.redundant_no_entry
    }

    /// Share of successful classifications that were redundant
    pub fn redundancy_rate(&self) -> f64 {
        let classified = self.total_classified();
        if classified == 0 {
            0.0
        } else {
            self.total_redundant() as f64 / classified as f64
        }
    }

    /// Mean processing time over all attempts
    pub fn avg_processing_time_ms(&self) -> f64 {
        let attempts = self.total_classified() + self.failures;
        if attempts == 0 {
            0.0
        } else {
            self.total_processing_ms as f64 / attempts as f64
        }
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Classifier Metrics Summary".to_string(),
            "==========================".to_string(),
            format!("Classified: {}", self.total_classified()),
            format!("  Unique: {}", self.unique),
            format!("  Exact duplicates: {}", self.exact_duplicates),
            format!("  Near duplicates: {}", self.near_duplicates),
            format!("  Redundant (no entry): {}", self.redundant_no_entry),
            format!("Failures: {}", self.failures),
            format!("Audit failures: {}", self.audit_failures),
            format!("Redundancy rate: {:.1}%", self.redundancy_rate() * 100.0),
            format!("Avg processing time: {:.2}ms", self.avg_processing_time_ms()),
        ];

        if !self.by_data_type.is_empty() {
            lines.push(String::new());
            lines.push("By data type:".to_string());
            let mut counts: Vec<_> = self.by_data_type.iter().collect();
            counts.sort();
            for (data_type, count) in counts {
                lines.push(format!("  {}: {}", data_type, count));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_domain::{EntryId, Fingerprint, NewEntry};

    fn unique() -> Decision {
        Decision::Unique(
            NewEntry::new("a", DataType::Text, Fingerprint::new_unchecked("0".repeat(64)))
                .into_entry(EntryId::new(), 1),
        )
    }

    fn no_entry() -> Decision {
        Decision::RedundantNoEntry {
            fingerprint: Fingerprint::new_unchecked("1".repeat(64)),
        }
    }

    #[test]
    fn test_metrics_creation() {
        let metrics = ClassifierMetrics::new();
        assert_eq!(metrics.total_classified(), 0);
        assert_eq!(metrics.redundancy_rate(), 0.0);
        assert_eq!(metrics.avg_processing_time_ms(), 0.0);
    }

    #[test]
    fn test_record_decisions() {
        let mut metrics = ClassifierMetrics::new();
        metrics.record_decision(&unique(), DataType::Text, 2);
        metrics.record_decision(&unique(), DataType::Number, 4);
        metrics.record_decision(&no_entry(), DataType::Text, 6);
        metrics.record_failure(8);

        assert_eq!(metrics.unique, 2);
        assert_eq!(metrics.redundant_no_entry, 1);
        assert_eq!(metrics.failures, 1);
        assert_eq!(metrics.total_classified(), 3);
        assert_eq!(metrics.by_data_type[&DataType::Text], 2);
        assert!((metrics.redundancy_rate() - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.avg_processing_time_ms(), 5.0);
    }

    #[test]
    fn test_reset() {
        let mut metrics = ClassifierMetrics::new();
        metrics.record_decision(&unique(), DataType::Text, 1);
        metrics.audit_failures = 3;
        metrics.reset();
        assert_eq!(metrics, ClassifierMetrics::default());
    }

    #[test]
    fn test_summary() {
        let mut metrics = ClassifierMetrics::new();
        metrics.record_decision(&unique(), DataType::Text, 1);
        metrics.record_decision(&no_entry(), DataType::Text, 1);

        let summary = metrics.summary();
        assert!(summary.contains("Classified: 2"));
        assert!(summary.contains("Redundancy rate: 50.0%"));
        assert!(summary.contains("  text: 2"));
    }
}
