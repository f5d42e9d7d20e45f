//! Error types for pipeline domain validation and parsing.

use super::{RunPhase, TaskName};
use thiserror::Error;

/// Errors returned while assembling a task catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two definitions share a name.
    #[error("duplicate task name: {0}")]
    DuplicateName(TaskName),

    /// No definition has the prerequisite kind.
    #[error("catalog has no prerequisite task")]
    MissingPrerequisite,

    /// More than one definition has the prerequisite kind.
    #[error("catalog has more than one prerequisite task: {first} and {second}")]
    MultiplePrerequisites {
        /// First prerequisite encountered.
        first: TaskName,
        /// Second prerequisite encountered.
        second: TaskName,
    },
}

/// Error returned when a run phase is advanced out of order.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invalid run phase transition from {from} to {to}")]
pub struct RunPhaseError {
    /// Phase the run was in.
    pub from: RunPhase,
    /// Phase that was requested.
    pub to: RunPhase,
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
