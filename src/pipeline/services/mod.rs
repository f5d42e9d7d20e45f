//! Application services for status tracking and run orchestration.

mod orchestrator;
mod task;
mod tracker;

pub use orchestrator::AggregationOrchestrator;
pub use task::execute_task;
pub use tracker::{StatusTracker, TrackerSnapshot, TransitionOutcome};
