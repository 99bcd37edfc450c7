//! Sentiment classification

pub mod panas;

pub use panas::PanasClassifier;

use crate::types::Category;
use crate::Result;

/// Classifier consulted by the pipeline and the aggregate store.
///
/// Implementations must be pure: the same input always yields the same
/// output, and no call mutates shared state.
pub trait Classifier: Send + Sync {
    /// Fixed set of categories this classifier can emit
    fn categories(&self) -> &[Category];

    /// Categories expressed by a text, deduplicated, in canonical order
    fn classify(&self, text: &str) -> Vec<Category>;

    /// Whether a text qualifies for sentiment analysis at all
    fn validate(&self, text: &str) -> bool;

    /// Aggregate value of a category holding `count` of `total` texts
    fn aggregate(&self, count: i64, total: i64) -> Result<f64>;

    /// Check whether a label belongs to the category set
    fn is_known(&self, category: &str) -> bool {
        self.categories().iter().any(|c| c.as_str() == category)
    }
}
