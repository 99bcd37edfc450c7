//! Pipeline statistics and metrics

use prometheus::{IntCounter, IntGauge, Registry, TextEncoder};

use crate::error::Error;
use crate::Result;

/// Prometheus metrics for one pipeline instance
pub struct PipelineMetrics {
    /// Registry owning every metric below
    registry: Registry,
    /// Texts offered to the pipeline
    pub submitted: IntCounter,
    /// Texts that passed validation
    pub accepted: IntCounter,
    /// Texts that failed validation
    pub rejected: IntCounter,
    /// Categorized items emitted by the classify stage
    pub categorized: IntCounter,
    /// Texts that matched no category
    pub uncategorized: IntCounter,
    /// Texts written to the text table
    pub texts_stored: IntCounter,
    /// Successful aggregate updates
    pub aggregate_updates: IntCounter,
    /// Failed text inserts
    pub store_faults: IntCounter,
    /// Failed aggregate updates
    pub update_faults: IntCounter,
    /// Worker tasks currently running
    pub active_workers: IntGauge,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter> {
    let counter = IntCounter::new(name, help).map_err(metric_error)?;
    registry
        .register(Box::new(counter.clone()))
        .map_err(metric_error)?;
    Ok(counter)
}

fn metric_error(e: prometheus::Error) -> Error {
    Error::Internal(format!("metric registration failed: {}", e))
}

impl PipelineMetrics {
    /// Create and register all metrics in a fresh registry
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let active_workers = IntGauge::new("pipeline_active_workers", "Worker tasks currently running")
            .map_err(metric_error)?;
        registry
            .register(Box::new(active_workers.clone()))
            .map_err(metric_error)?;

        Ok(Self {
            submitted: counter(&registry, "pipeline_texts_submitted_total", "Texts offered to the pipeline")?,
            accepted: counter(&registry, "pipeline_texts_accepted_total", "Texts that passed validation")?,
            rejected: counter(&registry, "pipeline_texts_rejected_total", "Texts that failed validation")?,
            categorized: counter(
                &registry,
                "pipeline_items_categorized_total",
                "Categorized items emitted by the classify stage",
            )?,
            uncategorized: counter(
                &registry,
                "pipeline_texts_uncategorized_total",
                "Texts dropped for matching no category",
            )?,
            texts_stored: counter(&registry, "store_texts_inserted_total", "Texts written to the text table")?,
            aggregate_updates: counter(&registry, "store_aggregate_updates_total", "Successful aggregate updates")?,
            store_faults: counter(&registry, "store_insert_faults_total", "Failed text inserts")?,
            update_faults: counter(&registry, "store_update_faults_total", "Failed aggregate updates")?,
            active_workers,
            registry,
        })
    }

    /// Render every metric in the Prometheus text format
    pub fn encode(&self) -> Result<String> {
        TextEncoder::new()
            .encode_to_string(&self.registry.gather())
            .map_err(|e| Error::Internal(format!("metric encoding failed: {}", e)))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current counter values
    pub fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            submitted: self.submitted.get(),
            accepted: self.accepted.get(),
            rejected: self.rejected.get(),
            categorized: self.categorized.get(),
            uncategorized: self.uncategorized.get(),
            texts_stored: self.texts_stored.get(),
            aggregate_updates: self.aggregate_updates.get(),
            store_faults: self.store_faults.get(),
            update_faults: self.update_faults.get(),
            active_workers: self.active_workers.get().max(0) as u64,
        }
    }
}

/// Pipeline statistics snapshot
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineStats {
    pub submitted: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub categorized: u64,
    pub uncategorized: u64,
    pub texts_stored: u64,
    pub aggregate_updates: u64,
    pub store_faults: u64,
    pub update_faults: u64,
    pub active_workers: u64,
}
