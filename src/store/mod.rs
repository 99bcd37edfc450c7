//! Text and sentiment storage

pub mod memory_store;

pub use memory_store::MemoryStore;

use crate::types::{Category, Sentiment, SentimentMap, StoredText};
use crate::Result;

/// Storage backend used by the persist stage and the query surface
pub trait SentimentStore: Send + Sync {
    /// Store a raw text under a freshly generated id
    fn insert_text(&self, text: &str) -> Result<StoredText>;

    /// Add `delta` texts to a category and renormalize every other category.
    ///
    /// Returns the updated entry of `category`.
    fn update_sentiment(&self, category: &Category, delta: i64) -> Result<Sentiment>;

    /// Snapshot of every category seen so far
    fn fetch_sentiments(&self) -> Result<SentimentMap>;

    /// Aggregate of a single category.
    ///
    /// Categories outside the classifier's set yield
    /// [`Error::CategoryNotFound`](crate::Error::CategoryNotFound), which
    /// still carries the best-effort entry.
    fn fetch_category_sentiment(&self, category: &str) -> Result<Sentiment>;
}
