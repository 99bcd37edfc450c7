//! Bounded FIFO partitions between pipeline stages

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::Error;
use crate::Result;

/// Partition identifier, `0..count` within its set
pub type PartitionId = usize;

/// A bounded FIFO queue with many publishers and exactly one consumer.
///
/// The receiving half is handed out once, to the worker that owns the
/// partition; publishers block while the queue is full.
pub struct Partition<T> {
    /// Partition ID
    id: PartitionId,
    /// Queue capacity
    capacity: usize,
    /// Publishing half
    sender: mpsc::Sender<T>,
    /// Receiving half, until a worker claims it
    receiver: Mutex<Option<mpsc::Receiver<T>>>,
}

impl<T> Partition<T> {
    /// Create a partition; a capacity of 0 is raised to 1
    pub fn new(id: PartitionId, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);

        Self {
            id,
            capacity,
            sender,
            receiver: Mutex::new(Some(receiver)),
        }
    }

    /// Publish an item, waiting for space if the partition is full
    pub async fn publish(&self, item: T) -> Result<()> {
        self.sender
            .send(item)
            .await
            .map_err(|_| Error::PipelineStopped)
    }

    /// Claim the receiving half; returns `None` once claimed
    pub fn take_receiver(&self) -> Option<mpsc::Receiver<T>> {
        self.receiver.lock().take()
    }

    /// Whether a consumer has claimed this partition
    pub fn is_claimed(&self) -> bool {
        self.receiver.lock().is_none()
    }

    pub fn id(&self) -> PartitionId {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items currently buffered
    pub fn len(&self) -> usize {
        self.capacity - self.sender.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the partition is full
    pub fn is_full(&self) -> bool {
        self.sender.capacity() == 0
    }
}

/// Fixed-size collection of partitions, indexed `0..len()`.
///
/// Never empty and never resized after creation.
pub struct PartitionSet<T> {
    partitions: Vec<Partition<T>>,
}

impl<T> PartitionSet<T> {
    /// Create `count` partitions of `buffer_size` slots each.
    ///
    /// A count of 0 yields one partition; a buffer size of 0 yields
    /// single-slot partitions.
    pub fn new(count: usize, buffer_size: usize) -> Self {
        let partitions = (0..count.max(1))
            .map(|id| Partition::new(id, buffer_size))
            .collect();

        Self { partitions }
    }

    /// Publish to the partition at `index`
    pub async fn publish(&self, index: PartitionId, item: T) -> Result<()> {
        let partition = self.partitions.get(index).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "partition index {} out of range (0..{})",
                index,
                self.partitions.len()
            ))
        })?;
        partition.publish(item).await
    }

    pub fn get(&self, index: PartitionId) -> Option<&Partition<T>> {
        self.partitions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Partition<T>> {
        self.partitions.iter()
    }

    /// Number of partitions
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Highest valid partition index
    pub fn max_index(&self) -> PartitionId {
        self.partitions.len() - 1
    }

    /// Per-partition capacity
    pub fn capacity(&self) -> usize {
        self.partitions[0].capacity()
    }

    /// Items buffered across all partitions
    pub fn buffered(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }
}
