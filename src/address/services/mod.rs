//! Application services for address resolution.

mod resolution;

pub use resolution::AddressResolutionService;
