//! Postcode to address-candidate resolution.
//!
//! Resolution turns one UK postcode into the ordered list of full address
//! strings a user picks from before any property data is fetched. Failures
//! degrade to an empty list and never block the caller. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Resolution services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
