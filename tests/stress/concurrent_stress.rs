//! Concurrent producers against small partitions

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{thread_rng, Rng};
use sentiment_pipeline::types::Category;
use sentiment_pipeline::SentimentStore;

use crate::common::{TestPipeline, TextGenerator};

/// Configuration for stress test
struct StressConfig {
    producers: usize,
    texts_per_producer: usize,
    partitions: usize,
    partition_buffer: usize,
}

async fn run_stress(config: StressConfig) {
    let test = Arc::new(TestPipeline::started(config.partitions, config.partition_buffer));
    let start = Instant::now();

    let mut handles = Vec::new();
    for _ in 0..config.producers {
        let test = test.clone();
        let count = config.texts_per_producer;
        handles.push(tokio::spawn(async move {
            let mut generator = TextGenerator::new();
            let mut expected: BTreeMap<Category, u64> = BTreeMap::new();

            for _ in 0..count {
                let neutral = thread_rng().gen_bool(0.1);
                let text = if neutral {
                    generator.next_neutral()
                } else {
                    generator.next_text()
                };
                for category in test.classifier.classify(&text) {
                    *expected.entry(category).or_default() += 1;
                }
                assert!(test.pipeline.enqueue(&text).await.unwrap());
            }
            expected
        }));
    }

    let mut expected: BTreeMap<Category, u64> = BTreeMap::new();
    for handle in handles {
        for (category, n) in handle.await.unwrap() {
            *expected.entry(category).or_default() += n;
        }
    }
    let expected_total: u64 = expected.values().sum();

    test.wait_for_total(expected_total, Duration::from_secs(30)).await;
    println!(
        "{} producers x {} texts over {} partitions: {} categorized in {:?}",
        config.producers,
        config.texts_per_producer,
        config.partitions,
        expected_total,
        start.elapsed()
    );

    let all = test.store.fetch_sentiments().unwrap();
    for (category, count) in &expected {
        assert_eq!(all[category].text_count, *count, "category {}", category);
    }
    assert_eq!(all.values().map(|s| s.text_count).sum::<u64>(), expected_total);
    assert_eq!(test.store.total_texts(), expected_total);
    assert_eq!(test.store.text_count() as u64, expected_total);

    for (category, sentiment) in &all {
        let share = sentiment.text_count as f64 / expected_total as f64;
        assert!(
            (sentiment.value - share).abs() < 1e-9,
            "category {} value {} share {}",
            category,
            sentiment.value,
            share
        );
    }

    let stats = test.pipeline.stats();
    assert_eq!(stats.accepted, (config.producers * config.texts_per_producer) as u64);
    assert_eq!(stats.store_faults + stats.update_faults, 0);

    test.pipeline.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stress_many_producers_tiny_buffers() {
    run_stress(StressConfig {
        producers: 8,
        texts_per_producer: 250,
        partitions: 4,
        partition_buffer: 1,
    })
    .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stress_single_partition_bottleneck() {
    run_stress(StressConfig {
        producers: 4,
        texts_per_producer: 250,
        partitions: 1,
        partition_buffer: 2,
    })
    .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stress_fire_and_forget_submissions() {
    let test = TestPipeline::started(4, 4);
    let mut generator = TextGenerator::new();

    let texts: Vec<String> = (0..500).map(|_| generator.next_text()).collect();
    let expected: u64 = texts
        .iter()
        .map(|t| test.classifier.classify(t).len() as u64)
        .sum();

    for text in &texts {
        assert!(test.pipeline.submit(text));
    }

    test.wait_for_total(expected, Duration::from_secs(30)).await;
    assert_eq!(test.store.total_texts(), expected);

    test.pipeline.stop().await;
}
