//! Fingerprint module - the exact-duplicate key

use std::fmt;

/// Hex-encoded content digest
///
/// Produced by the engine's fingerprint function; the domain only carries it.
/// Every supported algorithm yields a 32-byte digest, so a well-formed
/// fingerprint is always [`Fingerprint::HEX_LEN`] lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Length of a hex-encoded fingerprint
    pub const HEX_LEN: usize = 64;

    /// Wrap an already-computed hex digest without checking it
    ///
    /// Used by the fingerprint function itself and by tests that need a
    /// contrived collision.
    pub fn new_unchecked(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Parse a stored fingerprint, checking its shape
    ///
    /// # Examples
    ///
    /// ```
    /// use sift_domain::Fingerprint;
    ///
    /// let hex = "a".repeat(64);
    /// assert!(Fingerprint::parse(&hex).is_ok());
    /// assert!(Fingerprint::parse("xyz").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.len() != Self::HEX_LEN {
            return Err(format!(
                "Expected {} hex characters for fingerprint, got {}",
                Self::HEX_LEN,
                s.len()
            ));
        }
        if !s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
            return Err(format!("Fingerprint is not lowercase hex: {}", s));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_uppercase() {
        let hex = "A".repeat(64);
        assert!(Fingerprint::parse(&hex).is_err());
    }

    #[test]
    fn test_short_prefix() {
        let fp = Fingerprint::new_unchecked("0123456789abcdef".repeat(4));
        assert_eq!(fp.short(), "0123456789ab");

        let tiny = Fingerprint::new_unchecked("abc");
        assert_eq!(tiny.short(), "abc");
    }
}
