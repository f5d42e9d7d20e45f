//! Error types for address domain validation.

use thiserror::Error;

/// Errors returned while constructing address domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressDomainError {
    /// The postcode is empty after trimming.
    #[error("postcode must not be empty")]
    EmptyPostcode,

    /// The address candidate is empty after trimming.
    #[error("address candidate must not be empty")]
    EmptyCandidate,
}
