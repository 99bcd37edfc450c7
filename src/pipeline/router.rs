//! Round-robin partition selection

use parking_lot::Mutex;

use super::partition::PartitionId;

/// Shared cursor picking the next partition of a stage boundary.
///
/// Each boundary owns its own cursor. Advancing and reading the selected
/// index happen under the same lock, so concurrent publishers never
/// observe each other's selection.
#[derive(Debug, Default)]
pub struct RoundRobinCursor {
    index: Mutex<PartitionId>,
}

impl RoundRobinCursor {
    /// Create a cursor positioned at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the cursor and return the partition it now points at.
    ///
    /// The cursor wraps to 0 once it reaches `max_index` (inclusive).
    /// Starting from 0 the selections run `1, 2, .., max_index, 0, 1, ..`.
    pub fn next(&self, max_index: PartitionId) -> PartitionId {
        let mut index = self.index.lock();
        if *index >= max_index {
            *index = 0;
        } else {
            *index += 1;
        }
        *index
    }

    /// Partition selected by the most recent call to [`next`](Self::next)
    pub fn current(&self) -> PartitionId {
        *self.index.lock()
    }
}
