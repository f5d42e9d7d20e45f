//! Port contracts for the aggregation pipeline.

pub mod transport;

pub use transport::{SourceTransport, SourceTransportError, SourceTransportResult};

#[cfg(test)]
pub use transport::MockSourceTransport;
