//! Transport port performing one source request.

use crate::pipeline::domain::{SourceRequest, TaskFailure};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for source transport operations.
pub type SourceTransportResult<T> = Result<T, SourceTransportError>;

/// Contract for sending one source request and decoding its JSON body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceTransport: Send + Sync {
    /// Sends `request` and returns the decoded body.
    ///
    /// # Errors
    ///
    /// Returns [`SourceTransportError`] for invalid requests, connection
    /// failures, timeouts, non-success statuses, and bodies that are not
    /// JSON.
    async fn fetch(&self, request: &SourceRequest) -> SourceTransportResult<Value>;
}

/// Errors returned by source transport adapters.
#[derive(Debug, Clone, Error)]
pub enum SourceTransportError {
    /// The request descriptor could not be turned into an HTTP request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request exceeded the transport timeout.
    #[error("request timed out")]
    Timeout,

    /// The source answered with a non-success status.
    #[error("source returned status {0}")]
    Status(u16),

    /// The body could not be decoded as JSON.
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// Connection or protocol failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl SourceTransportError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

impl From<SourceTransportError> for TaskFailure {
    fn from(error: SourceTransportError) -> Self {
        match error {
            SourceTransportError::InvalidRequest(reason) => Self::InvalidRequest(reason),
            SourceTransportError::Timeout => Self::Timeout,
            SourceTransportError::Status(code) => Self::Status(code),
            SourceTransportError::MalformedBody(reason) => Self::MalformedBody(reason),
            SourceTransportError::Transport(cause) => Self::Transport(cause.to_string()),
        }
    }
}
