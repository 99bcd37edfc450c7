//! Classify stage: one worker per input partition

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::classifier::Classifier;
use crate::types::Item;

use super::partition::{PartitionId, PartitionSet};
use super::router::RoundRobinCursor;
use super::stats::PipelineMetrics;

/// Drains one input partition, fanning each text out into one
/// categorized copy per matched category
pub struct ClassifyWorker {
    /// Input partition this worker owns
    id: PartitionId,
    /// Receiving half of the input partition
    input: mpsc::Receiver<Item>,
    /// Partitions of the persist stage
    output: Arc<PartitionSet<Item>>,
    /// Cursor shared by every classify worker
    cursor: Arc<RoundRobinCursor>,
    classifier: Arc<dyn Classifier>,
    metrics: Arc<PipelineMetrics>,
}

impl ClassifyWorker {
    pub fn new(
        id: PartitionId,
        input: mpsc::Receiver<Item>,
        output: Arc<PartitionSet<Item>>,
        cursor: Arc<RoundRobinCursor>,
        classifier: Arc<dyn Classifier>,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            id,
            input,
            output,
            cursor,
            classifier,
            metrics,
        }
    }

    /// Run the worker on the current Tokio runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Worker main loop; returns once every publisher is gone
    pub async fn run(mut self) {
        tracing::info!("Classify worker {} starting", self.id);

        while let Some(item) = self.input.recv().await {
            self.process(item).await;
        }

        tracing::info!("Classify worker {} stopped", self.id);
    }

    async fn process(&self, item: Item) {
        let categories = self.classifier.classify(&item.text);

        if categories.is_empty() {
            self.metrics.uncategorized.inc();
            tracing::debug!(worker = self.id, text = %item.text, "no category matched, dropping");
            return;
        }

        for category in categories {
            let index = self.cursor.next(self.output.max_index());
            let categorized = Item::categorized(item.text.clone(), category);

            match self.output.publish(index, categorized).await {
                Ok(()) => {
                    self.metrics.categorized.inc();
                    tracing::trace!(worker = self.id, partition = index, "categorized item published");
                }
                Err(e) => {
                    tracing::error!(
                        worker = self.id,
                        partition = index,
                        text = %item.text,
                        "failed to publish categorized item: {}",
                        e
                    );
                }
            }
        }
    }
}
