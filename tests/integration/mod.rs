//! Integration tests for the full pipeline and HTTP surface

pub mod pipeline_test;
