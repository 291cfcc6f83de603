//! Configuration for the classification engine

use crate::error::ConfigError;
use crate::fingerprint::FingerprintAlgorithm;
use serde::{Deserialize, Serialize};
use sift_gatekeeper::ValidationConfig;
use std::time::Duration;

/// Near-duplicate matching strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// Levenshtein distance below a threshold
    #[default]
    EditDistance,
    /// Degraded mode: equality after lowercasing
    ExactIgnoreCase,
}

impl MatcherKind {
    /// Parse a configuration name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "edit_distance" => Some(MatcherKind::EditDistance),
            "exact_ignore_case" => Some(MatcherKind::ExactIgnoreCase),
            _ => None,
        }
    }
}

/// How items are compared against the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Matching strategy
    pub matcher: MatcherKind,

    /// Exclusive edit-distance threshold: near iff distance is below it
    pub edit_distance_threshold: usize,

    /// Normalized similarity floor; replaces `edit_distance_threshold` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_similarity: Option<f64>,

    /// Digest used for exact duplicate keys
    pub fingerprint: FingerprintAlgorithm,

    /// Entries fetched per page during the corpus scan
    pub scan_batch_size: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherKind::EditDistance,
            edit_distance_threshold: 3,
            min_similarity: None,
            fingerprint: FingerprintAlgorithm::Sha256,
            scan_batch_size: 1000,
        }
    }
}

impl DetectionConfig {
    /// Strict preset: only single-character edits count as near
    pub fn strict() -> Self {
        Self {
            edit_distance_threshold: 2,
            ..Self::default()
        }
    }

    /// Lenient preset: length-relative matching at 80% similarity
    pub fn lenient() -> Self {
        Self {
            min_similarity: Some(0.8),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.edit_distance_threshold == 0 {
            return Err(ConfigError::Invalid(
                "edit_distance_threshold must be at least 1".to_string(),
            ));
        }
        if let Some(floor) = self.min_similarity {
            if !(0.0..=1.0).contains(&floor) {
                return Err(ConfigError::Invalid(format!(
                    "min_similarity must be within [0, 1], got {}",
                    floor
                )));
            }
        }
        if self.scan_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "scan_batch_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Batch processing behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Retries per item after a storage failure
    pub max_retries: u32,

    /// Delay before the first retry, doubled on each further attempt
    pub retry_backoff_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff_ms: 50,
        }
    }
}

impl BatchConfig {
    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(10);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}

/// Engine configuration, one section per component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Near-duplicate detection
    pub detection: DetectionConfig,

    /// Batch retries
    pub batch: BatchConfig,

    /// Validation gate rules
    pub validation: ValidationConfig,
}

impl EngineConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detection.validate()?;
        self.validation
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.detection.edit_distance_threshold, 3);
        assert_eq!(config.detection.scan_batch_size, 1000);
        assert_eq!(config.batch.max_retries, 3);
        assert_eq!(config.validation.max_string_length, 1000);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(DetectionConfig::strict().validate().is_ok());
        assert!(DetectionConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_edit_distance() {
        let mut config = DetectionConfig::default();
        config.edit_distance_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_min_similarity() {
        let mut config = DetectionConfig::default();
        config.min_similarity = Some(1.5);
        assert!(config.validate().is_err());
        config.min_similarity = Some(-0.1);
        assert!(config.validate().is_err());
        config.min_similarity = Some(1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_scan_batch_size() {
        let mut config = DetectionConfig::default();
        config.scan_batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_validation_section() {
        let mut config = EngineConfig::default();
        config.validation.max_string_length = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml(
            r#"
            [detection]
            matcher = "exact_ignore_case"
            fingerprint = "blake3"
            "#,
        )
        .unwrap();
        assert_eq!(config.detection.matcher, MatcherKind::ExactIgnoreCase);
        assert_eq!(config.detection.fingerprint, FingerprintAlgorithm::Blake3);
        assert_eq!(config.detection.edit_distance_threshold, 3);
        assert_eq!(config.batch, BatchConfig::default());
    }

    #[cfg(feature = "edit-distance")]
    #[test]
    fn test_edit_distance_threshold_is_exclusive() {
        let config = EngineConfig::from_toml("[detection]\nedit_distance_threshold = 2").unwrap();
        assert_eq!(config.detection.edit_distance_threshold, 2);

        let matcher = crate::matcher::select_matcher(&config.detection);
        assert!(matcher.is_near("abc", "abd"));
        assert!(!matcher.is_near("abc", "xyc"));
    }

    #[test]
    fn test_unknown_matcher_rejected() {
        let result = EngineConfig::from_toml("[detection]\nmatcher = \"fuzzy\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = EngineConfig::default();
        config.detection.min_similarity = Some(0.9);
        let parsed = EngineConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_backoff_doubles() {
        let batch = BatchConfig::default();
        assert_eq!(batch.backoff(1), Duration::from_millis(50));
        assert_eq!(batch.backoff(2), Duration::from_millis(100));
        assert_eq!(batch.backoff(3), Duration::from_millis(200));
    }
}
