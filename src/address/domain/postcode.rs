//! Normalized UK postcode value.

use super::AddressDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// UK postcode used as the primary lookup key.
///
/// Input is trimmed, upper-cased, and internal runs of whitespace collapse
/// to a single space, so `" sk9  5ae "` and `"SK9 5AE"` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Postcode(String);

impl Postcode {
    /// Creates a normalized postcode.
    ///
    /// # Errors
    ///
    /// Returns [`AddressDomainError::EmptyPostcode`] when the value contains
    /// only whitespace.
    pub fn new(value: impl AsRef<str>) -> Result<Self, AddressDomainError> {
        let normalized = value
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(AddressDomainError::EmptyPostcode);
        }
        Ok(Self(normalized))
    }

    /// Returns the postcode as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Postcode {
    type Error = AddressDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Postcode> for String {
    fn from(value: Postcode) -> Self {
        value.0
    }
}

impl AsRef<str> for Postcode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
