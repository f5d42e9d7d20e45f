//! Proplens: one-shot research of a UK residential property.
//!
//! Given a postcode, the crate resolves the list of candidate addresses.
//! For a selected address it queries a catalog of public data sources,
//! tracking a live status per source and collecting the raw JSON each one
//! returns.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types and rules with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (HTTP, in-memory)
//!
//! # Modules
//!
//! - [`address`]: Postcode to address-candidate resolution
//! - [`pipeline`]: Two-phase fan-out aggregation over the data sources
//! - [`session`]: Per-postcode selection and fetch flow
//! - [`render`]: Text rendering of candidates, statuses, and results
//! - [`config`]: Environment-driven configuration

pub mod address;
pub mod config;
pub mod pipeline;
pub mod render;
pub mod session;
