//! Unit tests for address resolution.
