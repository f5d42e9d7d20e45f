//! Adapter implementations for the address lookup port.

pub mod http;
pub mod memory;
