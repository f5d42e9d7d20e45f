//! Lookup port for postcode-keyed address sources.

use crate::address::domain::{AddressRecord, Postcode};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for address lookup operations.
pub type AddressLookupResult<T> = Result<T, AddressLookupError>;

/// Address source contract.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Returns the raw address records for a postcode in source order.
    ///
    /// # Errors
    ///
    /// Returns [`AddressLookupError`] when the source is unreachable, answers
    /// with a non-success status, or returns a body without an `addresses`
    /// list.
    async fn find(&self, postcode: &Postcode) -> AddressLookupResult<Vec<AddressRecord>>;
}

/// Errors returned by address lookup adapters.
#[derive(Debug, Clone, Error)]
pub enum AddressLookupError {
    /// The source answered with a non-success HTTP status.
    #[error("address source returned status {0}")]
    Status(u16),

    /// The response body could not be decoded as an address list.
    #[error("malformed address payload: {0}")]
    MalformedPayload(String),

    /// Transport-layer failure.
    #[error("address transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl AddressLookupError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
