//! Audit and metric records

use crate::DataType;
use std::fmt;

/// Kind of operation recorded in the processing log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// A classification call (the only kind the engine produces)
    Classify,
    /// Direct insert
    Insert,
    /// Update of an existing row
    Update,
    /// Deletion of a row
    Delete,
    /// Standalone validation
    Validate,
}

impl OperationType {
    /// Get the operation name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Classify => "classify",
            OperationType::Insert => "insert",
            OperationType::Update => "update",
            OperationType::Delete => "delete",
            OperationType::Validate => "validate",
        }
    }

    /// Parse an operation name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "classify" => Some(OperationType::Classify),
            "insert" => Some(OperationType::Insert),
            "update" => Some(OperationType::Update),
            "delete" => Some(OperationType::Delete),
            "validate" => Some(OperationType::Validate),
            _ => None,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only audit row, one per classification attempt
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingLogRecord {
    /// What was attempted
    pub operation_type: OperationType,

    /// Input content
    pub content: String,

    /// Input data type
    pub data_type: DataType,

    /// Fingerprint of the input (hex)
    pub fingerprint: String,

    /// Similarity outcome (0.0-1.0)
    pub similarity_score: f64,

    /// Whether the item was classified redundant
    pub is_redundant: bool,

    /// Whether the item was flagged as a near-duplicate
    pub is_false_positive: bool,

    /// Wall-clock time spent classifying
    pub processing_time_ms: u64,

    /// Whether the attempt completed without error
    pub success: bool,

    /// Error message for failed attempts
    pub error_message: Option<String>,

    /// When the attempt finished (Unix milliseconds)
    pub processed_at: u64,
}

/// Named numeric observation for trend analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Metric name, e.g. `redundancy_rate`
    pub name: String,

    /// Observed value
    pub value: f64,

    /// Observation time (Unix milliseconds)
    pub timestamp: u64,

    /// Data type this metric applies to, if any
    pub data_type: Option<DataType>,
}

impl Metric {
    /// Create a metric stamped with the current time
    pub fn now(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            timestamp: crate::now_millis(),
            data_type: None,
        }
    }

    /// Tag the metric with a data type
    pub fn for_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }
}
