//! Sentiment pipeline: partitioned, two-stage sentiment aggregation
//!
//! Short texts are validated, classified into PANAS-t sentiment
//! categories by a pool of classify workers, and counted by a pool of
//! persist workers into a self-normalizing per-category aggregate.

#![warn(rust_2018_idioms)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod server;
pub mod store;
pub mod types;

// Re-export main types
pub use classifier::{Classifier, PanasClassifier};
pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::Pipeline;
pub use store::{MemoryStore, SentimentStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
