//! Domain model for address resolution.
//!
//! Address records arrive from the lookup source as loosely structured JSON;
//! the domain turns them into display candidates without any knowledge of
//! the transport that produced them.

mod candidate;
mod error;
mod postcode;

pub use candidate::{AddressCandidate, AddressLookupPayload, AddressRecord};
pub use error::AddressDomainError;
pub use postcode::Postcode;
