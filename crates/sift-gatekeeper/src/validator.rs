//! Item validation logic

use crate::{RejectionReason, ValidationConfig};
use regex::Regex;
use sift_domain::traits::ValidationGate;
use sift_domain::DataType;
use std::sync::LazyLock;

/// Boolean tokens accepted for the `boolean` type (case-insensitive)
const BOOLEAN_TOKENS: [&str; 6] = ["true", "false", "1", "0", "yes", "no"];

/// Accepted date layouts: YYYY-MM-DD, MM/DD/YYYY and DD-MM-YYYY
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\d{4}-\d{2}-\d{2}$",
        r"^\d{2}/\d{2}/\d{4}$",
        r"^\d{2}-\d{2}-\d{4}$",
    ]
    .into_iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// The Gatekeeper screens items before classification
#[derive(Debug, Clone, Default)]
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Access the active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate content against its declared data type
    ///
    /// Rules are checked in order and the first failure is returned.
    ///
    /// # Returns
    ///
    /// The parsed [`DataType`] on acceptance
    pub fn validate(&self, content: &str, data_type: &str) -> Result<DataType, RejectionReason> {
        // 1. Content presence
        if content.trim().is_empty() {
            return Err(RejectionReason::EmptyContent);
        }

        // 2. Length bound
        let length = content.chars().count();
        if length > self.config.max_string_length {
            return Err(RejectionReason::ContentTooLong {
                max: self.config.max_string_length,
                actual: length,
            });
        }

        // 3. Type membership
        let parsed = DataType::parse(data_type)
            .ok_or_else(|| RejectionReason::InvalidDataType(data_type.to_string()))?;

        // 4. Type-specific shape
        if self.config.validate_type_shapes {
            check_shape(content, parsed)?;
        }

        tracing::trace!(data_type = %parsed, length, "Item accepted by gatekeeper");
        Ok(parsed)
    }
}

impl ValidationGate for Gatekeeper {
    type Rejection = RejectionReason;

    fn validate(&self, content: &str, data_type: &str) -> Result<DataType, RejectionReason> {
        Gatekeeper::validate(self, content, data_type)
    }
}

// Numbers tolerate surrounding whitespace; boolean and date tokens must match
// the whole content.
fn check_shape(content: &str, data_type: DataType) -> Result<(), RejectionReason> {
    match data_type {
        DataType::Number => {
            if content.trim().parse::<f64>().is_err() {
                return Err(RejectionReason::NotNumeric);
            }
        }
        DataType::Boolean => {
            let lower = content.to_lowercase();
            if !BOOLEAN_TOKENS.contains(&lower.as_str()) {
                return Err(RejectionReason::NotBoolean);
            }
        }
        DataType::Date | DataType::DateTime => {
            if !DATE_PATTERNS.iter().any(|re| re.is_match(content)) {
                return Err(RejectionReason::NotDate);
            }
        }
        // No additional checks
        DataType::Text | DataType::Mixed => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gatekeeper() -> Gatekeeper {
        Gatekeeper::default_config()
    }

    #[test]
    fn test_valid_text() {
        assert_eq!(gatekeeper().validate("Sample text", "text"), Ok(DataType::Text));
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        assert_eq!(gatekeeper().validate("", "text"), Err(RejectionReason::EmptyContent));
        assert_eq!(gatekeeper().validate("   \t", "text"), Err(RejectionReason::EmptyContent));
    }

    #[test]
    fn test_length_bound() {
        let at_limit = "a".repeat(1000);
        assert!(gatekeeper().validate(&at_limit, "text").is_ok());

        let over = "a".repeat(1001);
        assert_eq!(
            gatekeeper().validate(&over, "text"),
            Err(RejectionReason::ContentTooLong { max: 1000, actual: 1001 })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let gatekeeper = Gatekeeper::new(ValidationConfig {
            max_string_length: 3,
            ..ValidationConfig::default()
        });
        assert!(gatekeeper.validate("héé", "text").is_ok());
    }

    #[test]
    fn test_invalid_data_type() {
        assert_eq!(
            gatekeeper().validate("Sample text", "invalid_type"),
            Err(RejectionReason::InvalidDataType("invalid_type".to_string()))
        );
    }

    #[test]
    fn test_data_type_is_case_insensitive() {
        assert_eq!(gatekeeper().validate("x", " TEXT "), Ok(DataType::Text));
    }

    #[test]
    fn test_number() {
        let g = gatekeeper();
        assert_eq!(g.validate("123.45", "number"), Ok(DataType::Number));
        assert_eq!(g.validate("-7", "number"), Ok(DataType::Number));
        assert_eq!(g.validate("1e3", "number"), Ok(DataType::Number));
        assert_eq!(g.validate("not a number", "number"), Err(RejectionReason::NotNumeric));
    }

    #[test]
    fn test_boolean() {
        let g = gatekeeper();
        for token in ["true", "FALSE", "1", "0", "Yes", "no"] {
            assert_eq!(g.validate(token, "boolean"), Ok(DataType::Boolean), "{}", token);
        }
        assert_eq!(g.validate("maybe", "boolean"), Err(RejectionReason::NotBoolean));
    }

    #[test]
    fn test_date_shapes() {
        let g = gatekeeper();
        assert_eq!(g.validate("2023-01-01", "date"), Ok(DataType::Date));
        assert_eq!(g.validate("01/31/2023", "date"), Ok(DataType::Date));
        assert_eq!(g.validate("31-01-2023", "date"), Ok(DataType::Date));
        assert_eq!(g.validate("invalid-date", "date"), Err(RejectionReason::NotDate));
        assert_eq!(g.validate("2023/01/01", "date"), Err(RejectionReason::NotDate));
        assert_eq!(g.validate("2023-1-1", "date"), Err(RejectionReason::NotDate));
        assert_eq!(g.validate("2023-01-01T10:00", "date"), Err(RejectionReason::NotDate));
        assert_eq!(g.validate("x2023-01-01", "date"), Err(RejectionReason::NotDate));
    }

    #[test]
    fn test_date_and_boolean_reject_surrounding_whitespace() {
        let g = gatekeeper();
        assert_eq!(g.validate(" 2023-01-01", "date"), Err(RejectionReason::NotDate));
        assert_eq!(g.validate("2023-01-01\n", "datetime"), Err(RejectionReason::NotDate));
        assert_eq!(g.validate("true ", "boolean"), Err(RejectionReason::NotBoolean));
    }

    #[test]
    fn test_number_tolerates_surrounding_whitespace() {
        assert_eq!(gatekeeper().validate(" 42 ", "number"), Ok(DataType::Number));
    }

    #[test]
    fn test_datetime_uses_date_shapes() {
        let g = gatekeeper();
        assert_eq!(g.validate("2023-01-01", "datetime"), Ok(DataType::DateTime));
        assert_eq!(g.validate("whenever", "datetime"), Err(RejectionReason::NotDate));
    }

    #[test]
    fn test_mixed_accepts_any_content() {
        assert_eq!(gatekeeper().validate("abc 123 !", "mixed"), Ok(DataType::Mixed));
    }

    #[test]
    fn test_permissive_skips_shapes() {
        let g = Gatekeeper::new(ValidationConfig::permissive());
        assert_eq!(g.validate("not a number", "number"), Ok(DataType::Number));
        assert_eq!(g.validate("", "number"), Err(RejectionReason::EmptyContent));
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(RejectionReason::EmptyContent.to_string(), "Data content cannot be empty");
        assert_eq!(RejectionReason::NotDate.to_string(), "Data content is not a valid date format");
    }

    #[test]
    fn test_usable_as_validation_gate() {
        fn screen<G: ValidationGate>(gate: &G) -> bool {
            gate.validate("2023-01-01", "date").is_ok()
        }
        assert!(screen(&gatekeeper()));
    }
}
