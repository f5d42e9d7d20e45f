//! Step definitions for property fetch scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
