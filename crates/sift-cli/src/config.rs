//! Configuration management for the CLI.
//!
//! Settings are read once at startup from `~/.sift/config.toml` (or the
//! `--config` path), overridden by `SIFT_*` environment variables, then
//! validated. Sections are handed to component constructors; nothing reads
//! configuration globally afterwards.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use sift_engine::{
    BatchConfig, DetectionConfig, EngineConfig, FingerprintAlgorithm, MatcherKind,
};
use sift_gatekeeper::ValidationConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// Entry store location and limits
    pub database: DatabaseConfig,

    /// Near-duplicate detection
    pub detection: DetectionConfig,

    /// Batch retries
    pub batch: BatchConfig,

    /// Validation gate rules
    pub validation: ValidationConfig,

    /// Tracing output
    pub logging: LoggingConfig,

    /// Terminal output
    pub output: OutputSettings,
}

/// Database settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path
    pub path: PathBuf,

    /// Upper bound on any single store call (milliseconds)
    pub timeout_ms: u64,
}

impl DatabaseConfig {
    /// The store call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sift.db"),
            timeout_ms: 5000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`info`, `sift_engine=debug`, ...); `RUST_LOG` wins
    pub level: String,

    /// Append logs to this file instead of stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Terminal output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl SiftConfig {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".sift").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. A missing file at the default path
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `SIFT_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = var("SIFT_DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }
        if let Some(v) = var("SIFT_DATABASE_TIMEOUT_MS") {
            self.database.timeout_ms = parse_var("SIFT_DATABASE_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = var("SIFT_MATCHER") {
            self.detection.matcher = MatcherKind::parse(&v).ok_or_else(|| {
                CliError::Config(format!(
                    "SIFT_MATCHER must be edit_distance or exact_ignore_case, got '{}'",
                    v
                ))
            })?;
        }
        if let Some(v) = var("SIFT_EDIT_DISTANCE_THRESHOLD") {
            self.detection.edit_distance_threshold =
                parse_var("SIFT_EDIT_DISTANCE_THRESHOLD", &v)?;
        }
        if let Some(v) = var("SIFT_MIN_SIMILARITY") {
            self.detection.min_similarity = Some(parse_var("SIFT_MIN_SIMILARITY", &v)?);
        }
        if let Some(v) = var("SIFT_FINGERPRINT") {
            self.detection.fingerprint = FingerprintAlgorithm::parse(&v).ok_or_else(|| {
                CliError::Config(format!(
                    "SIFT_FINGERPRINT must be sha256 or blake3, got '{}'",
                    v
                ))
            })?;
        }
        if let Some(v) = var("SIFT_SCAN_BATCH_SIZE") {
            self.detection.scan_batch_size = parse_var("SIFT_SCAN_BATCH_SIZE", &v)?;
        }
        if let Some(v) = var("SIFT_MAX_BATCH_RETRIES") {
            self.batch.max_retries = parse_var("SIFT_MAX_BATCH_RETRIES", &v)?;
        }
        if let Some(v) = var("SIFT_MAX_STRING_LENGTH") {
            self.validation.max_string_length = parse_var("SIFT_MAX_STRING_LENGTH", &v)?;
        }
        if let Some(level) = var("SIFT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(file) = var("SIFT_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        if self.database.timeout_ms == 0 {
            return Err(CliError::Config(
                "database.timeout_ms must be greater than 0".into(),
            ));
        }
        EnvFilter::try_new(&self.logging.level).map_err(|e| {
            CliError::Config(format!(
                "Invalid logging.level '{}': {}",
                self.logging.level, e
            ))
        })?;
        self.engine_config().validate()?;
        Ok(())
    }

    /// The engine's share of the configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            detection: self.detection.clone(),
            batch: self.batch.clone(),
            validation: self.validation.clone(),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CliError::Config(format!("{} has invalid value '{}': {}", key, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SiftConfig::default();
        assert_eq!(config.database.path, PathBuf::from("sift.db"));
        assert_eq!(config.database.timeout_ms, 5000);
        assert_eq!(config.detection.edit_distance_threshold, 3);
        assert_eq!(config.batch.max_retries, 3);
        assert_eq!(config.validation.max_string_length, 1000);
        assert_eq!(config.logging.level, "info");
        assert!(config.output.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: SiftConfig = toml::from_str(
            r#"
            [database]
            path = "/tmp/other.db"

            [detection]
            matcher = "exact_ignore_case"

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.database.timeout_ms, 5000);
        assert_eq!(config.detection.matcher, MatcherKind::ExactIgnoreCase);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SiftConfig::default();
        config
            .apply_overrides(vars(&[
                ("SIFT_DATABASE_PATH", "env.db"),
                ("SIFT_DATABASE_TIMEOUT_MS", "250"),
                ("SIFT_MATCHER", "exact_ignore_case"),
                ("SIFT_EDIT_DISTANCE_THRESHOLD", "5"),
                ("SIFT_MIN_SIMILARITY", "0.9"),
                ("SIFT_FINGERPRINT", "blake3"),
                ("SIFT_SCAN_BATCH_SIZE", "64"),
                ("SIFT_MAX_BATCH_RETRIES", "1"),
                ("SIFT_MAX_STRING_LENGTH", "200"),
                ("SIFT_LOG_LEVEL", "debug"),
                ("SIFT_LOG_FILE", "sift.log"),
            ]))
            .unwrap();

        assert_eq!(config.database.path, PathBuf::from("env.db"));
        assert_eq!(config.database.timeout(), Duration::from_millis(250));
        assert_eq!(config.detection.matcher, MatcherKind::ExactIgnoreCase);
        assert_eq!(config.detection.edit_distance_threshold, 5);
        assert_eq!(config.detection.min_similarity, Some(0.9));
        assert_eq!(config.detection.fingerprint, FingerprintAlgorithm::Blake3);
        assert_eq!(config.detection.scan_batch_size, 64);
        assert_eq!(config.batch.max_retries, 1);
        assert_eq!(config.validation.max_string_length, 200);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("sift.log")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = SiftConfig::default();
        let result = config.apply_overrides(vars(&[("SIFT_SCAN_BATCH_SIZE", "many")]));
        assert!(matches!(result, Err(CliError::Config(_))));

        let result = config.apply_overrides(vars(&[("SIFT_FINGERPRINT", "md5")]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let mut config = SiftConfig::default();
        config.detection.min_similarity = Some(2.0);
        assert!(matches!(config.validate(), Err(CliError::EngineConfig(_))));

        let mut config = SiftConfig::default();
        config.database.timeout_ms = 0;
        assert!(matches!(config.validate(), Err(CliError::Config(_))));

        let mut config = SiftConfig::default();
        config.detection.scan_batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = SiftConfig::default();
        config.detection.fingerprint = FingerprintAlgorithm::Blake3;
        config.logging.file = Some(PathBuf::from("sift.log"));
        config.save(&path).unwrap();

        let loaded = SiftConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SiftConfig::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
