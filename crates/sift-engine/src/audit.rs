//! Audit logging for classification attempts
//!
//! Every classification produces exactly one [`ProcessingLogRecord`]. Writing
//! it must never change the outcome of the classification, so
//! [`AuditLogger::record`] swallows sink failures after logging and counting
//! them.

use sift_domain::traits::AuditSink;
use sift_domain::{
    now_millis, DataType, Decision, Fingerprint, OperationType, ProcessingLogRecord,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// One classification attempt, ready to be recorded
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    record: ProcessingLogRecord,
}

impl AuditEvent {
    /// Event for a completed classification
    pub fn classified(
        content: &str,
        data_type: DataType,
        fingerprint: &Fingerprint,
        decision: &Decision,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            record: ProcessingLogRecord {
                operation_type: OperationType::Classify,
                content: content.to_string(),
                data_type,
                fingerprint: fingerprint.to_string(),
                similarity_score: decision.similarity_score(),
                is_redundant: decision.is_redundant(),
                is_false_positive: decision.is_false_positive(),
                processing_time_ms,
                success: true,
                error_message: None,
                processed_at: now_millis(),
            },
        }
    }

    /// Event for a classification that ended in an error
    pub fn failed(
        content: &str,
        data_type: DataType,
        fingerprint: &Fingerprint,
        error: &str,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            record: ProcessingLogRecord {
                operation_type: OperationType::Classify,
                content: content.to_string(),
                data_type,
                fingerprint: fingerprint.to_string(),
                similarity_score: 0.0,
                is_redundant: false,
                is_false_positive: false,
                processing_time_ms,
                success: false,
                error_message: Some(error.to_string()),
                processed_at: now_millis(),
            },
        }
    }

    /// The record that will be appended
    pub fn record(&self) -> &ProcessingLogRecord {
        &self.record
    }
}

/// Appends audit events to a sink without ever failing the caller
#[derive(Debug)]
pub struct AuditLogger<A> {
    sink: A,
    failures: AtomicU64,
}

impl<A: AuditSink> AuditLogger<A> {
    /// Create a logger writing to `sink`
    pub fn new(sink: A) -> Self {
        Self {
            sink,
            failures: AtomicU64::new(0),
        }
    }

    /// Append an event
    ///
    /// A sink failure is logged at error level and counted, never returned.
    pub fn record(&self, event: AuditEvent) {
        if let Err(e) = self.sink.append(&event.record) {
            self.failures.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                error = %e,
                fingerprint = %short(&event.record.fingerprint),
                "Failed to write audit record"
            );
        }
    }

    /// Number of events the sink rejected
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// The underlying sink
    pub fn sink(&self) -> &A {
        &self.sink
    }
}

fn short(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}
