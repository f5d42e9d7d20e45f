//! Domain model for the aggregation pipeline.
//!
//! Everything here is transport-agnostic: definitions describe requests,
//! outcomes are plain values, and the status and result maps carry no
//! synchronization of their own.

mod catalog;
mod definition;
mod error;
mod ids;
mod outcome;
mod request;
mod results;
mod run;
mod status;

pub use catalog::TaskCatalog;
pub use definition::{EndpointBuilder, TaskDefinition, TaskInput, TaskKind};
pub use error::{CatalogError, ParseTaskStatusError, RunPhaseError};
pub use ids::{RunId, TaskName};
pub use outcome::{TaskFailure, TaskOutcome};
pub use request::{BasicCredentials, SourceRequest};
pub use results::CollectedResults;
pub use run::{RunPhase, SettledRun, SettledRunParams};
pub use status::{StatusMap, TaskStatus};
