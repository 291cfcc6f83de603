//! Data type module - the fixed set of item kinds the system accepts

use std::fmt;

/// Declared type of an incoming data item
///
/// The Validation Gate checks that the content matches its declared type
/// before the item reaches the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    /// Free-form text
    Text,

    /// Numeric value (integer or float)
    Number,

    /// Anything non-empty
    Mixed,

    /// Boolean-like token (true/false/1/0/yes/no)
    Boolean,

    /// Calendar date
    Date,

    /// Date with time component (validated with the same shapes as `Date`)
    DateTime,
}

impl DataType {
    /// All accepted data types, in declaration order
    pub const ALL: [DataType; 6] = [
        DataType::Text,
        DataType::Number,
        DataType::Mixed,
        DataType::Boolean,
        DataType::Date,
        DataType::DateTime,
    ];

    /// Get the data type name as stored and displayed
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Number => "number",
            DataType::Mixed => "mixed",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::DateTime => "datetime",
        }
    }

    /// Parse a data type from a string, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(DataType::Text),
            "number" => Some(DataType::Number),
            "mixed" => Some(DataType::Mixed),
            "boolean" => Some(DataType::Boolean),
            "date" => Some(DataType::Date),
            "datetime" => Some(DataType::DateTime),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid data type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(DataType::parse("TEXT"), Some(DataType::Text));
        assert_eq!(DataType::parse("DateTime"), Some(DataType::DateTime));
        assert_eq!(DataType::parse(" number "), Some(DataType::Number));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(DataType::parse("invalid_type"), None);
        assert!("".parse::<DataType>().is_err());
    }

    #[test]
    fn test_as_str_matches_parse() {
        for data_type in DataType::ALL {
            assert_eq!(DataType::parse(data_type.as_str()), Some(data_type));
        }
    }
}
