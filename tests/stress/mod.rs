//! Stress tests

pub mod concurrent_stress;
