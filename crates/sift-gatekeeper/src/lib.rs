//! Sift Gatekeeper
//!
//! Pre-screens data items before they reach the redundancy classifier.
//!
//! The Gatekeeper provides:
//! - Content checks (non-empty, bounded length)
//! - Data type membership checks
//! - Type-specific shape checks (number, boolean, date formats)
//!
//! The classifier trusts the gate and never re-validates.
//!
//! # Examples
//!
//! ```
//! use sift_gatekeeper::{Gatekeeper, ValidationConfig};
//! use sift_domain::DataType;
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//! assert_eq!(gatekeeper.validate("12345", "number"), Ok(DataType::Number));
//! assert!(gatekeeper.validate("", "text").is_err());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::{GatekeeperError, RejectionReason};
pub use validator::Gatekeeper;
