//! In-memory store: the stored-text table and the aggregate table

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::classifier::Classifier;
use crate::error::Error;
use crate::types::{Category, Sentiment, SentimentMap, StoredText, TextId};
use crate::Result;

use super::SentimentStore;

/// Per-category aggregates plus the global text total.
///
/// `total_texts == sum(text_count)` holds whenever the lock is released.
#[derive(Debug, Default)]
struct AggregateTable {
    sentiments: SentimentMap,
    total_texts: u64,
}

/// Memory-resident store; all state is lost on drop
pub struct MemoryStore {
    /// Source of the aggregate function and the known category set
    classifier: Arc<dyn Classifier>,
    /// Append-only text table
    texts: DashMap<TextId, StoredText>,
    /// Single lock over every aggregate
    aggregates: Mutex<AggregateTable>,
    /// Aggregate computations that failed and kept the previous value
    aggregate_faults: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            texts: DashMap::new(),
            aggregates: Mutex::new(AggregateTable::default()),
            aggregate_faults: AtomicU64::new(0),
        }
    }

    /// Create a store holding existing aggregates.
    ///
    /// The global total is derived from the per-category counts.
    pub fn seeded(classifier: Arc<dyn Classifier>, sentiments: SentimentMap) -> Self {
        let total_texts = sentiments.values().map(|s| s.text_count).sum();
        Self {
            classifier,
            texts: DashMap::new(),
            aggregates: Mutex::new(AggregateTable {
                sentiments,
                total_texts,
            }),
            aggregate_faults: AtomicU64::new(0),
        }
    }

    /// Insert a text under a caller-supplied id
    pub fn insert_stored(&self, stored: StoredText) -> Result<()> {
        match self.texts.entry(stored.id) {
            Entry::Occupied(_) => Err(Error::DuplicateKey(stored.id)),
            Entry::Vacant(slot) => {
                slot.insert(stored);
                Ok(())
            }
        }
    }

    /// Global number of counted texts (sum over all categories)
    pub fn total_texts(&self) -> u64 {
        self.aggregates.lock().total_texts
    }

    /// Number of entries in the text table
    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    /// Look up a stored text
    pub fn get_text(&self, id: &TextId) -> Option<StoredText> {
        self.texts.get(id).map(|entry| entry.value().clone())
    }

    /// Copy of every stored text, in no particular order
    pub fn texts(&self) -> Vec<StoredText> {
        self.texts.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of aggregate computations that fell back to the previous value
    pub fn aggregate_faults(&self) -> u64 {
        self.aggregate_faults.load(Ordering::Relaxed)
    }
}

impl SentimentStore for MemoryStore {
    fn insert_text(&self, text: &str) -> Result<StoredText> {
        let stored = StoredText {
            id: TextId::new(),
            text: text.to_string(),
        };
        self.insert_stored(stored.clone())?;
        tracing::trace!(id = %stored.id, "text stored");
        Ok(stored)
    }

    fn update_sentiment(&self, category: &Category, delta: i64) -> Result<Sentiment> {
        // Read, recompute and renormalize under one critical section: every
        // category's value depends on the global total.
        let mut table = self.aggregates.lock();

        let current = table
            .sentiments
            .get(category.as_str())
            .copied()
            .unwrap_or_default();
        let old_count = current.text_count as i64;
        let old_total = table.total_texts as i64;

        let (new_count, new_total) = match (old_count.checked_add(delta), old_total.checked_add(delta)) {
            (Some(count), Some(total)) if count >= 0 && total >= 0 => (count, total),
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "delta {} out of range for category {} (count={}, total={})",
                    delta, category, old_count, old_total
                )));
            }
        };

        let new_value = match self.classifier.aggregate(new_count, new_total) {
            Ok(value) => value,
            Err(e) => {
                self.aggregate_faults.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    category = %category,
                    count = new_count,
                    total = new_total,
                    "aggregate computation failed, keeping previous value: {}",
                    e
                );
                current.value
            }
        };

        let updated = Sentiment::new(new_value, new_count as u64);
        table.sentiments.insert(category.clone(), updated);
        table.total_texts = new_total as u64;

        if new_total > 0 && new_total != old_total {
            let scale = old_total as f64 / new_total as f64;
            for (other, sentiment) in table.sentiments.iter_mut() {
                if other != category {
                    sentiment.value *= scale;
                }
            }
        }

        Ok(updated)
    }

    fn fetch_sentiments(&self) -> Result<SentimentMap> {
        Ok(self.aggregates.lock().sentiments.clone())
    }

    fn fetch_category_sentiment(&self, category: &str) -> Result<Sentiment> {
        let sentiment = self
            .aggregates
            .lock()
            .sentiments
            .get(category)
            .copied()
            .unwrap_or_default();

        if !self.classifier.is_known(category) {
            return Err(Error::CategoryNotFound {
                category: Category::from(category),
                sentiment,
            });
        }

        Ok(sentiment)
    }
}
