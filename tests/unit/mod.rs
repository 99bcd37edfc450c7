//! Unit tests for pipeline components

pub mod partition_tests;
pub mod store_tests;
