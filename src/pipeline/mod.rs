//! Partitioned two-stage processing pipeline

pub mod classify;
pub mod partition;
pub mod persist;
pub mod pipeline;
pub mod router;
pub mod stats;

pub use classify::ClassifyWorker;
pub use partition::{Partition, PartitionId, PartitionSet};
pub use persist::PersistWorker;
pub use pipeline::Pipeline;
pub use router::RoundRobinCursor;
pub use stats::{PipelineMetrics, PipelineStats};
