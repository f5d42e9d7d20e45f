//! Port contracts for address resolution.

pub mod lookup;

pub use lookup::{AddressLookup, AddressLookupError, AddressLookupResult};
