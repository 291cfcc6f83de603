//! Gatekeeper configuration

use crate::GatekeeperError;
use serde::{Deserialize, Serialize};

/// Configuration for validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum content length in characters
    pub max_string_length: usize,

    /// Enable type-specific shape checks (number, boolean, date)
    pub validate_type_shapes: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_string_length: 1000,
            validate_type_shapes: true,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (content and type membership only)
    pub fn permissive() -> Self {
        Self {
            validate_type_shapes: false,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.max_string_length == 0 {
            return Err(GatekeeperError::Config(
                "max_string_length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.max_string_length, 1000);
        assert!(config.validate_type_shapes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_length_rejected() {
        let config = ValidationConfig {
            max_string_length: 0,
            ..ValidationConfig::default()
        };
        assert!(matches!(config.validate(), Err(GatekeeperError::Config(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ValidationConfig = toml::from_str("max_string_length = 20").unwrap();
        assert_eq!(config.max_string_length, 20);
        assert!(config.validate_type_shapes);
    }
}
