//! Persist stage: one worker per output partition

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::store::SentimentStore;
use crate::types::Item;

use super::partition::PartitionId;
use super::stats::PipelineMetrics;

/// Drains one output partition, storing each text and counting it
/// towards its category.
///
/// Faults are logged per item; the worker always moves on to the next one.
pub struct PersistWorker {
    /// Output partition this worker owns
    id: PartitionId,
    /// Receiving half of the output partition
    input: mpsc::Receiver<Item>,
    store: Arc<dyn SentimentStore>,
    metrics: Arc<PipelineMetrics>,
}

impl PersistWorker {
    pub fn new(
        id: PartitionId,
        input: mpsc::Receiver<Item>,
        store: Arc<dyn SentimentStore>,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            id,
            input,
            store,
            metrics,
        }
    }

    /// Run the worker on the current Tokio runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Worker main loop; returns once every publisher is gone
    pub async fn run(mut self) {
        tracing::info!("Persist worker {} starting", self.id);

        while let Some(item) = self.input.recv().await {
            self.process(item);
        }

        tracing::info!("Persist worker {} stopped", self.id);
    }

    fn process(&self, item: Item) {
        let Some(category) = item.category else {
            self.metrics.update_faults.inc();
            tracing::warn!(worker = self.id, text = %item.text, "uncategorized item reached persist stage");
            return;
        };

        match self.store.insert_text(&item.text) {
            Ok(stored) => {
                self.metrics.texts_stored.inc();
                tracing::trace!(worker = self.id, id = %stored.id, "text inserted");
            }
            Err(e) => {
                self.metrics.store_faults.inc();
                tracing::error!(worker = self.id, text = %item.text, "error inserting the text: {}", e);
            }
        }

        match self.store.update_sentiment(&category, 1) {
            Ok(sentiment) => {
                self.metrics.aggregate_updates.inc();
                tracing::debug!(
                    worker = self.id,
                    category = %category,
                    value = sentiment.value,
                    count = sentiment.text_count,
                    "sentiment updated"
                );
            }
            Err(e) => {
                self.metrics.update_faults.inc();
                tracing::error!(
                    worker = self.id,
                    category = %category,
                    text = %item.text,
                    "error updating sentiment: {}",
                    e
                );
            }
        }
    }
}
