//! Adapter implementations for the source transport port.

pub mod http;
pub mod memory;
