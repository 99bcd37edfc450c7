//! Core types used throughout the pipeline

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentiment category label (e.g. `jovility`, `sadness`)
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category from a label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Label as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a stored text
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextId(Uuid);

impl TextId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TextId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TextId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unit of work flowing between pipeline stages.
///
/// Producers create items with no category; the classify stage emits one
/// categorized copy per matched category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Raw text
    pub text: String,
    /// Category assigned by the classify stage
    pub category: Option<Category>,
}

impl Item {
    /// Uncategorized item as submitted by a producer
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
        }
    }

    /// Categorized copy of a text
    pub fn categorized(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category: Some(category),
        }
    }
}

/// Text persisted by the persist stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredText {
    pub id: TextId,
    pub text: String,
}

/// Aggregate sentiment of one category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    /// Share of the total text volume, in `[0, 1]`
    pub value: f64,
    /// Number of texts counted for this category
    pub text_count: u64,
}

impl Sentiment {
    pub fn new(value: f64, text_count: u64) -> Self {
        Self { value, text_count }
    }
}

/// Category -> aggregate mapping, ordered by category label
pub type SentimentMap = BTreeMap<Category, Sentiment>;
