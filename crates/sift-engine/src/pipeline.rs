//! Ingestion pipeline: validation gate, then classification
//!
//! Items rejected by the gate never reach the classifier and leave no audit
//! record. Batches retry items that fail on storage errors.

use crate::classifier::RedundancyClassifier;
use crate::config::BatchConfig;
use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};
use sift_domain::traits::{AuditSink, EntryStore, MetricSink, ValidationGate};
use sift_domain::{Decision, Metric};
use std::time::Instant;

/// Result of ingesting one item
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The validation gate refused the item
    Rejected {
        /// Human-readable rejection reason
        reason: String,
    },

    /// The item was classified
    Classified(Decision),
}

impl IngestOutcome {
    /// The decision, if the item was classified
    pub fn decision(&self) -> Option<&Decision> {
        match self {
            IngestOutcome::Classified(decision) => Some(decision),
            IngestOutcome::Rejected { .. } => None,
        }
    }

    /// Stable name for logs and output
    pub fn kind(&self) -> &'static str {
        match self {
            IngestOutcome::Rejected { .. } => "rejected",
            IngestOutcome::Classified(decision) => decision.kind(),
        }
    }
}

/// One item of a batch file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Raw content
    pub content: String,

    /// Declared data type name
    #[serde(rename = "type", alias = "data_type", default = "default_data_type")]
    pub data_type: String,
}

fn default_data_type() -> String {
    "text".to_string()
}

impl BatchItem {
    /// Create a batch item
    pub fn new(content: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            data_type: data_type.into(),
        }
    }
}

/// Result of one batch item, after retries
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItemResult {
    /// Position in the batch
    pub index: usize,

    /// Final outcome
    pub outcome: Result<IngestOutcome, ClassifierError>,

    /// Attempts made, including the first
    pub attempts: u32,

    /// Wall time across all attempts
    pub processing_time_ms: u64,
}

/// Results of a batch, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Per-item results
    pub results: Vec<BatchItemResult>,
}

impl BatchReport {
    /// Assemble a report from results produced in any order
    pub fn from_results(mut results: Vec<BatchItemResult>) -> Self {
        results.sort_by_key(|r| r.index);
        Self { results }
    }

    /// Aggregate counts
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.results.len(),
            ..BatchSummary::default()
        };
        for result in &self.results {
            summary.total_processing_ms += result.processing_time_ms;
            match &result.outcome {
                Ok(IngestOutcome::Rejected { .. }) => summary.rejected += 1,
                Ok(IngestOutcome::Classified(decision)) => match decision {
                    Decision::Unique(_) => summary.unique += 1,
                    Decision::ExactDuplicate(_) => summary.exact_duplicates += 1,
                    Decision::NearDuplicate { .. } => summary.near_duplicates += 1,
                    Decision::RedundantNoEntry { .. } => summary.redundant_no_entry += 1,
                },
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Aggregate counts for a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Items in the batch
    pub total: usize,
    /// Stored as new entries
    pub unique: usize,
    /// Exact duplicates
    pub exact_duplicates: usize,
    /// Near duplicates
    pub near_duplicates: usize,
    /// Redundant without a readable entry
    pub redundant_no_entry: usize,
    /// Refused by the validation gate
    pub rejected: usize,
    /// Failed after all retries
    pub failed: usize,
    /// Wall time across all items
    pub total_processing_ms: u64,
}

impl BatchSummary {
    /// Items successfully classified
    pub fn classified(&self) -> usize {
        self.unique + self.redundant()
    }

    /// Items classified as redundant
    pub fn redundant(&self) -> usize {
        self.exact_duplicates + self.near_duplicates + self.redundant_no_entry
    }

    /// Share of classified items that were redundant
    pub fn redundancy_rate(&self) -> f64 {
        match self.classified() {
            0 => 0.0,
            n => self.redundant() as f64 / n as f64,
        }
    }

    /// Mean wall time per item
    pub fn avg_processing_time_ms(&self) -> f64 {
        match self.total {
            0 => 0.0,
            n => self.total_processing_ms as f64 / n as f64,
        }
    }

    /// Write the batch metrics to a sink
    pub fn record_metrics<M: MetricSink>(&self, sink: &M) -> Result<(), M::Error> {
        sink.record_metric(&Metric::now("redundancy_rate", self.redundancy_rate()))?;
        sink.record_metric(&Metric::now(
            "avg_processing_time_ms",
            self.avg_processing_time_ms(),
        ))?;
        sink.record_metric(&Metric::now("batch_size", self.total as f64))?;
        Ok(())
    }
}

/// Validation gate followed by the redundancy classifier
pub struct Pipeline<G, S, A> {
    gate: G,
    classifier: RedundancyClassifier<S, A>,
    batch: BatchConfig,
}

impl<G, S, A> Pipeline<G, S, A>
where
    G: ValidationGate,
    S: EntryStore,
    A: AuditSink,
{
    /// Create a pipeline
    pub fn new(gate: G, classifier: RedundancyClassifier<S, A>, batch: BatchConfig) -> Self {
        Self {
            gate,
            classifier,
            batch,
        }
    }

    /// Validate and classify one item
    ///
    /// A rejection is an `Ok` outcome; only storage failures are errors.
    pub fn ingest(&self, content: &str, data_type: &str) -> Result<IngestOutcome, ClassifierError> {
        let data_type = match self.gate.validate(content, data_type) {
            Ok(data_type) => data_type,
            Err(reason) => {
                tracing::debug!(%reason, "Item rejected by validation gate");
                return Ok(IngestOutcome::Rejected {
                    reason: reason.to_string(),
                });
            }
        };

        self.classifier
            .classify(content, data_type)
            .map(IngestOutcome::Classified)
    }

    /// Ingest one item, retrying storage failures per the batch configuration
    pub fn ingest_with_retry(&self, index: usize, item: &BatchItem) -> BatchItemResult {
        let started = Instant::now();
        let mut attempts = 0;

        let outcome = loop {
            attempts += 1;
            match self.ingest(&item.content, &item.data_type) {
                Err(e) if e.is_retryable() && attempts <= self.batch.max_retries => {
                    let delay = self.batch.backoff(attempts);
                    tracing::warn!(
                        index,
                        attempt = attempts,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying batch item"
                    );
                    std::thread::sleep(delay);
                }
                outcome => break outcome,
            }
        };

        BatchItemResult {
            index,
            outcome,
            attempts,
            processing_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Process a batch sequentially, in order
    pub fn process_batch(&self, items: &[BatchItem]) -> BatchReport {
        tracing::info!(items = items.len(), "Processing batch");
        let results = items
            .iter()
            .enumerate()
            .map(|(index, item)| self.ingest_with_retry(index, item))
            .collect();
        let report = BatchReport::from_results(results);

        let summary = report.summary();
        tracing::info!(
            total = summary.total,
            unique = summary.unique,
            redundant = summary.redundant(),
            rejected = summary.rejected,
            failed = summary.failed,
            "Batch complete"
        );
        report
    }

    /// The classifier
    pub fn classifier(&self) -> &RedundancyClassifier<S, A> {
        &self.classifier
    }

    /// The validation gate
    pub fn gate(&self) -> &G {
        &self.gate
    }
}
