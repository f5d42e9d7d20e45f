//! Unit tests for the aggregation pipeline.

mod orchestrator_tests;
