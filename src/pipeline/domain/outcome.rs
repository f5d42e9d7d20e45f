//! Settlement values produced by source tasks.

use super::TaskStatus;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a task settled without a payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskFailure {
    /// The request could not be sent or the connection failed.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The request exceeded the transport timeout.
    #[error("request timed out")]
    Timeout,

    /// The source answered with a non-success HTTP status.
    #[error("source returned status {0}")]
    Status(u16),

    /// The response body was not valid JSON.
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// The request could not be built from the definition.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result of running one task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// The task produced an opaque JSON payload.
    Success(Value),
    /// The task failed; nothing is recorded for it.
    Failure(TaskFailure),
}

impl TaskOutcome {
    /// Outcome of a stub task: success with an empty object.
    #[must_use]
    pub fn empty() -> Self {
        Self::Success(Value::Object(Map::new()))
    }

    /// Returns the terminal status this outcome maps to.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        match self {
            Self::Success(_) => TaskStatus::Success,
            Self::Failure(_) => TaskStatus::Error,
        }
    }

    /// Returns the payload of a successful outcome.
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }

    /// Consumes the outcome, returning the payload of a success.
    #[must_use]
    pub fn into_payload(self) -> Option<Value> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }

    /// Returns the failure of an unsuccessful outcome.
    #[must_use]
    pub const fn failure(&self) -> Option<&TaskFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}
