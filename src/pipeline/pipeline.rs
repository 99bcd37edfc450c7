//! Two-stage sentiment pipeline
//!
//! ```text
//! submit -> input partitions -> classify workers -> output partitions -> persist workers -> store
//! ```
//!
//! Each stage runs exactly one worker per partition of its input set.
//! Publishers pick partitions through a round-robin cursor owned by the
//! stage boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::classifier::Classifier;
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::store::SentimentStore;
use crate::types::{Item, Sentiment, SentimentMap};
use crate::Result;

use super::classify::ClassifyWorker;
use super::partition::PartitionSet;
use super::persist::PersistWorker;
use super::router::RoundRobinCursor;
use super::stats::{PipelineMetrics, PipelineStats};

/// Main pipeline structure
pub struct Pipeline {
    /// Validates, classifies and aggregates
    classifier: Arc<dyn Classifier>,
    /// Destination of the persist stage
    store: Arc<dyn SentimentStore>,
    /// Partitions feeding the classify stage
    input: Arc<PartitionSet<Item>>,
    /// Partitions feeding the persist stage
    output: Arc<PartitionSet<Item>>,
    /// Producer -> classify boundary
    input_cursor: Arc<RoundRobinCursor>,
    /// Classify -> persist boundary
    output_cursor: Arc<RoundRobinCursor>,
    metrics: Arc<PipelineMetrics>,
    /// Worker handles, classify stage first
    worker_handles: Mutex<Vec<JoinHandle<()>>>,
    /// Workers have been spawned
    started: AtomicBool,
    /// Stopped flag
    stopped: AtomicBool,
}

impl Pipeline {
    /// Build both partition sets and cursors; no worker runs until
    /// [`start`](Self::start)
    pub fn new(
        config: &PipelineConfig,
        store: Arc<dyn SentimentStore>,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self> {
        let input = Arc::new(PartitionSet::new(config.partitions, config.partition_buffer));
        let output = Arc::new(PartitionSet::new(config.partitions, config.partition_buffer));

        Ok(Self {
            classifier,
            store,
            input,
            output,
            input_cursor: Arc::new(RoundRobinCursor::new()),
            output_cursor: Arc::new(RoundRobinCursor::new()),
            metrics: Arc::new(PipelineMetrics::new()?),
            worker_handles: Mutex::new(Vec::new()),
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        })
    }

    /// Spawn one classify worker per input partition and one persist
    /// worker per output partition.
    ///
    /// Must be called from within a Tokio runtime; workers run until
    /// [`stop`](Self::stop).
    pub fn start(&self) -> Result<()> {
        if Handle::try_current().is_err() {
            return Err(Error::InvalidState("pipeline must start inside a Tokio runtime".into()));
        }
        if self.stopped.load(Ordering::SeqCst) {
            return Err(Error::PipelineStopped);
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(Error::InvalidState("Pipeline already started".into()));
        }

        let mut handles = self.worker_handles.lock();

        for partition in self.input.iter() {
            let rx = partition.take_receiver().ok_or_else(|| {
                Error::Internal(format!("input partition {} already claimed", partition.id()))
            })?;
            let worker = ClassifyWorker::new(
                partition.id(),
                rx,
                self.output.clone(),
                self.output_cursor.clone(),
                self.classifier.clone(),
                self.metrics.clone(),
            );
            handles.push(worker.spawn());
        }

        for partition in self.output.iter() {
            let rx = partition.take_receiver().ok_or_else(|| {
                Error::Internal(format!("output partition {} already claimed", partition.id()))
            })?;
            let worker = PersistWorker::new(
                partition.id(),
                rx,
                self.store.clone(),
                self.metrics.clone(),
            );
            handles.push(worker.spawn());
        }

        self.metrics.active_workers.set(handles.len() as i64);
        tracing::info!(
            "Pipeline started with {} classify and {} persist workers (buffer {})",
            self.input.len(),
            self.output.len(),
            self.input.capacity()
        );
        Ok(())
    }

    /// Accept a text if it validates, enqueueing it in the background.
    ///
    /// Returns immediately; `false` means the text was rejected or the
    /// pipeline is stopped.
    pub fn submit(&self, text: &str) -> bool {
        let Some((index, item)) = self.admit(text) else {
            return false;
        };

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::error!("submit called outside a Tokio runtime");
                return false;
            }
        };

        let input = self.input.clone();
        handle.spawn(async move {
            if let Err(e) = input.publish(index, item).await {
                tracing::warn!(partition = index, "failed to enqueue text: {}", e);
            }
        });
        true
    }

    /// Accept a text if it validates and wait until it is enqueued.
    ///
    /// Unlike [`submit`](Self::submit), back-pressure from a full
    /// partition reaches the caller.
    pub async fn enqueue(&self, text: &str) -> Result<bool> {
        match self.admit(text) {
            Some((index, item)) => {
                self.input.publish(index, item).await?;
                Ok(true)
            }
            None if self.is_stopped() => Err(Error::PipelineStopped),
            None => Ok(false),
        }
    }

    /// Validate a text and pick its input partition
    fn admit(&self, text: &str) -> Option<(usize, Item)> {
        if self.is_stopped() {
            return None;
        }
        self.metrics.submitted.inc();

        if !self.classifier.validate(text) {
            self.metrics.rejected.inc();
            tracing::debug!(text = %text, "text rejected");
            return None;
        }

        self.metrics.accepted.inc();
        let index = self.input_cursor.next(self.input.max_index());
        Some((index, Item::new(text)))
    }

    /// Snapshot of every category's aggregate
    pub fn sentiments(&self) -> Result<SentimentMap> {
        self.store.fetch_sentiments()
    }

    /// Aggregate of one category; see
    /// [`SentimentStore::fetch_category_sentiment`]
    pub fn category_sentiment(&self, category: &str) -> Result<Sentiment> {
        self.store.fetch_category_sentiment(category)
    }

    /// Abort every worker and refuse further submissions.
    ///
    /// Items still buffered in partitions are discarded.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }

        let handles: Vec<_> = self.worker_handles.lock().drain(..).collect();
        for handle in &handles {
            handle.abort();
        }
        for handle in handles {
            // Cancelled tasks resolve to a JoinError
            let _ = handle.await;
        }

        self.metrics.active_workers.set(0);
        tracing::info!("Pipeline stopped");
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::SeqCst) && !self.is_stopped()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Number of partitions per stage
    pub fn partitions(&self) -> usize {
        self.input.len()
    }

    /// Capacity of each partition
    pub fn partition_buffer(&self) -> usize {
        self.input.capacity()
    }

    /// Items waiting in either stage's partitions
    pub fn buffered(&self) -> usize {
        self.input.buffered() + self.output.buffered()
    }

    pub fn store(&self) -> &Arc<dyn SentimentStore> {
        &self.store
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    pub fn metrics(&self) -> &Arc<PipelineMetrics> {
        &self.metrics
    }

    /// Get pipeline statistics
    pub fn stats(&self) -> PipelineStats {
        self.metrics.snapshot()
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        for handle in self.worker_handles.get_mut().drain(..) {
            handle.abort();
        }
    }
}
