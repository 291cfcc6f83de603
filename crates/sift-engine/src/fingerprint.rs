//! Content fingerprinting for exact duplicate detection
//!
//! Content is hashed verbatim: no trimming, case folding or whitespace
//! collapsing. Case-only variants are the near-duplicate matcher's concern.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sift_domain::Fingerprint;
use std::fmt;

/// Digest used to fingerprint content
///
/// Both variants produce 32-byte digests, hex-encoded to 64 characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// BLAKE3
    Blake3,
}

impl FingerprintAlgorithm {
    /// Configuration name of the algorithm
    pub fn as_str(&self) -> &'static str {
        match self {
            FingerprintAlgorithm::Sha256 => "sha256",
            FingerprintAlgorithm::Blake3 => "blake3",
        }
    }

    /// Parse a configuration name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sha256" => Some(FingerprintAlgorithm::Sha256),
            "blake3" => Some(FingerprintAlgorithm::Blake3),
            _ => None,
        }
    }
}

impl fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes fingerprints with a fixed algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct Fingerprinter {
    algorithm: FingerprintAlgorithm,
}

impl Fingerprinter {
    /// Create a fingerprinter for the given algorithm
    pub fn new(algorithm: FingerprintAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The algorithm in use
    pub fn algorithm(&self) -> FingerprintAlgorithm {
        self.algorithm
    }

    /// Fingerprint content
    ///
    /// Deterministic across calls and process restarts.
    #[must_use]
    pub fn fingerprint(&self, content: &str) -> Fingerprint {
        let hex = match self.algorithm {
            FingerprintAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(content.as_bytes());
                hex::encode(hasher.finalize())
            }
            FingerprintAlgorithm::Blake3 => blake3::hash(content.as_bytes()).to_hex().to_string(),
        };
        Fingerprint::new_unchecked(hex)
    }
}

/// Fingerprint content with the default algorithm (SHA-256)
#[must_use]
pub fn fingerprint(content: &str) -> Fingerprint {
    Fingerprinter::default().fingerprint(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_sha256_digest() {
        let fp = fingerprint("hello");
        assert_eq!(
            fp.as_str(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_blake3_length_and_difference() {
        let blake = Fingerprinter::new(FingerprintAlgorithm::Blake3).fingerprint("hello");
        assert_eq!(blake.as_str().len(), Fingerprint::HEX_LEN);
        assert_ne!(blake, fingerprint("hello"));
    }

    #[test]
    fn test_case_sensitive() {
        assert_ne!(fingerprint("Hello"), fingerprint("hello"));
    }

    #[test]
    fn test_no_normalization() {
        assert_ne!(fingerprint("hello world"), fingerprint(" hello world"));
        assert_ne!(fingerprint("hello world"), fingerprint("hello  world"));
    }

    #[test]
    fn test_empty_content_has_fingerprint() {
        assert_eq!(fingerprint("").as_str().len(), Fingerprint::HEX_LEN);
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!(FingerprintAlgorithm::parse("SHA256"), Some(FingerprintAlgorithm::Sha256));
        assert_eq!(FingerprintAlgorithm::parse("blake3"), Some(FingerprintAlgorithm::Blake3));
        assert_eq!(FingerprintAlgorithm::parse("md5"), None);
    }

    proptest! {
        #[test]
        fn prop_fingerprint_is_deterministic(content in ".*") {
            for algorithm in [FingerprintAlgorithm::Sha256, FingerprintAlgorithm::Blake3] {
                let fingerprinter = Fingerprinter::new(algorithm);
                prop_assert_eq!(fingerprinter.fingerprint(&content), fingerprinter.fingerprint(&content));
            }
        }

        #[test]
        fn prop_fingerprint_is_valid_hex(content in ".*") {
            let fp = fingerprint(&content);
            prop_assert!(Fingerprint::parse(fp.as_str()).is_ok());
        }
    }
}
