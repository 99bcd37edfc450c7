//! Partition set and round-robin cursor properties

use sentiment_pipeline::pipeline::{PartitionSet, RoundRobinCursor};
use std::collections::HashSet;

#[test]
fn test_create_clamps_count_and_capacity() {
    for count in 0..5 {
        for buffer in 0..5 {
            let set: PartitionSet<String> = PartitionSet::new(count, buffer);
            assert_eq!(set.len(), count.max(1));
            assert!(set.iter().all(|p| p.capacity() == buffer.max(1)));

            let ids: HashSet<_> = set.iter().map(|p| p.id()).collect();
            assert_eq!(ids, (0..count.max(1)).collect::<HashSet<_>>());
        }
    }
}

#[test]
fn test_cursor_cycles_once_per_round() {
    let max = 4;
    let cursor = RoundRobinCursor::new();

    for _round in 0..3 {
        let cycle: Vec<_> = (0..=max).map(|_| cursor.next(max)).collect();
        assert_eq!(cycle.iter().filter(|&&i| i == 0).count(), 1);

        let distinct: HashSet<_> = cycle.iter().copied().collect();
        assert_eq!(distinct, (0..=max).collect::<HashSet<_>>());
    }
}

#[tokio::test]
async fn test_round_robin_publish_spreads_items() {
    let set: PartitionSet<u32> = PartitionSet::new(3, 4);
    let cursor = RoundRobinCursor::new();

    for i in 0..6 {
        let index = cursor.next(set.max_index());
        set.publish(index, i).await.unwrap();
    }

    for partition in set.iter() {
        assert_eq!(partition.len(), 2, "partition {}", partition.id());
    }

    // Cursor starts at 0 and selects 1 first
    let mut rx = set.get(1).unwrap().take_receiver().unwrap();
    assert_eq!(rx.recv().await, Some(0));
    assert_eq!(rx.recv().await, Some(3));
}
