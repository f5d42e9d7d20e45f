//! Raw address records and the display candidates assembled from them.

use super::AddressDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator placed between address parts in a candidate string.
const PART_SEPARATOR: &str = ", ";

/// Body returned by the address lookup source.
///
/// The `addresses` field is required; a body without it is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressLookupPayload {
    /// Address records in source order.
    pub addresses: Vec<AddressRecord>,
}

/// One structured address record as returned by the lookup source.
///
/// Every field is optional; the source omits or blanks parts that do not
/// apply to a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressRecord {
    /// First building line.
    pub line_1: Option<String>,
    /// Second building line.
    pub line_2: Option<String>,
    /// Third building line.
    pub line_3: Option<String>,
    /// Fourth building line.
    pub line_4: Option<String>,
    /// Locality within the town.
    pub locality: Option<String>,
    /// Post town or city.
    pub town_or_city: Option<String>,
    /// County.
    pub county: Option<String>,
    /// Postcode exactly as the source formats it.
    pub postcode: Option<String>,
}

impl AddressRecord {
    /// Returns the present, non-blank parts in display order.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        [
            &self.line_1,
            &self.line_2,
            &self.line_3,
            &self.line_4,
            &self.locality,
            &self.town_or_city,
            &self.county,
            &self.postcode,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.trim().is_empty())
    }
}

/// Human-readable address a user selects before a fetch run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressCandidate(String);

impl AddressCandidate {
    /// Creates a candidate from an already assembled display string.
    ///
    /// # Errors
    ///
    /// Returns [`AddressDomainError::EmptyCandidate`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, AddressDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AddressDomainError::EmptyCandidate);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Assembles a candidate from a record.
    ///
    /// A record with no non-blank parts yields an empty candidate, so every
    /// record keeps its position in the list.
    #[must_use]
    pub fn from_record(record: &AddressRecord) -> Self {
        Self(record.parts().collect::<Vec<_>>().join(PART_SEPARATOR))
    }

    /// Returns the candidate as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the candidate has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for AddressCandidate {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AddressCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
