//! Sift Engine
//!
//! Redundancy detection for incoming data items. The engine decides whether
//! an item is unique, an exact duplicate or a near duplicate of what is
//! already stored, stores unique items, and keeps an audit trail of every
//! decision.
//!
//! # Components
//!
//! - [`Fingerprinter`]: content digest used as the exact-duplicate key
//! - [`NearDuplicateMatcher`]: edit-distance or degraded case-insensitive matching
//! - [`RedundancyClassifier`]: the decision procedure
//! - [`AuditLogger`]: one audit record per classification, never fails the caller
//! - [`Pipeline`]: validation gate in front of the classifier, with batch retries
//!
//! # Examples
//!
//! ```
//! use sift_engine::{DetectionConfig, RedundancyClassifier};
//! use sift_domain::DataType;
//! use sift_store::InMemoryStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let classifier =
//!     RedundancyClassifier::new(Arc::clone(&store), store, &DetectionConfig::default());
//!
//! let first = classifier.classify("Sample text data 1", DataType::Text).unwrap();
//! let again = classifier.classify("Sample text data 1", DataType::Text).unwrap();
//! assert!(first.is_unique());
//! assert_eq!(again.kind(), "exact_duplicate");
//! ```

#![warn(missing_docs)]

mod audit;
mod classifier;
mod config;
mod error;
mod fingerprint;
pub mod matcher;
mod metrics;
mod pipeline;

pub use audit::{AuditEvent, AuditLogger};
pub use classifier::RedundancyClassifier;
pub use config::{BatchConfig, DetectionConfig, EngineConfig, MatcherKind};
pub use error::{ClassifierError, ConfigError};
pub use fingerprint::{fingerprint, FingerprintAlgorithm, Fingerprinter};
#[cfg(feature = "edit-distance")]
pub use matcher::EditDistanceMatcher;
pub use matcher::{select_matcher, ExactIgnoreCaseMatcher, MatchOutcome, NearDuplicateMatcher};
pub use metrics::ClassifierMetrics;
pub use pipeline::{
    BatchItem, BatchItemResult, BatchReport, BatchSummary, IngestOutcome, Pipeline,
};
