//! Per-property data aggregation pipeline.
//!
//! A run resolves one prerequisite source, then fans out to every remaining
//! source concurrently, tracking a live status per source and collecting the
//! raw JSON each one returns. Individual failures stay inside their task;
//! a run always settles. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Tracking and orchestration services in [`services`]
//! - The standard UK source table in [`sources`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod sources;

#[cfg(test)]
mod tests;
