//! Core error types for the sentiment pipeline

use std::io;
use thiserror::Error;

use crate::types::{Category, Sentiment, TextId};

/// Main error type for pipeline and store operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from system operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A generated text id collided with an existing entry
    #[error("Duplicate key: {0}")]
    DuplicateKey(TextId),

    /// Category is not part of the classifier's category set.
    ///
    /// Carries the best-effort entry held for the category (zero-valued
    /// unless something wrote to it directly).
    #[error("Category {category} doesn't exist")]
    CategoryNotFound {
        category: Category,
        sentiment: Sentiment,
    },

    /// Aggregate function called outside its domain
    #[error("Invalid aggregate input: count={count}, total={total}")]
    InvalidAggregate { count: i64, total: i64 },

    /// Invalid argument provided
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Pipeline has been stopped
    #[error("Pipeline stopped")]
    PipelineStopped,

    /// Invalid state error
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::DuplicateKey(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::CategoryNotFound { .. })
    }
}
