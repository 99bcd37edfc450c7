//! End-to-end pipeline scenarios

use std::time::Duration;

use sentiment_pipeline::SentimentStore;

use crate::common::{wait_until, TestPipeline, TextGenerator};

#[tokio::test]
async fn test_single_text_single_partition() {
    let test = TestPipeline::started(1, 1);

    assert!(test.pipeline.submit("I am happy"));
    test.wait_for_total(1, Duration::from_secs(5)).await;

    let jovility = test.pipeline.category_sentiment("jovility").unwrap();
    assert_eq!(jovility.text_count, 1);
    assert_eq!(jovility.value, 1.0);

    let texts = test.store.texts();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].text, "I am happy");

    test.pipeline.stop().await;
}

#[tokio::test]
async fn test_multi_category_text_counts_each_category() {
    let test = TestPipeline::started(4, 10);

    assert!(test.pipeline.submit("I am happy and sad"));
    test.wait_for_total(2, Duration::from_secs(5)).await;

    let all = test.pipeline.sentiments().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.get("jovility").unwrap().text_count, 1);
    assert_eq!(all.get("sadness").unwrap().text_count, 1);
    assert!((all.get("jovility").unwrap().value - 0.5).abs() < 1e-12);
    assert!((all.get("sadness").unwrap().value - 0.5).abs() < 1e-12);

    // One stored entry per categorized copy
    assert_eq!(test.store.text_count(), 2);

    test.pipeline.stop().await;
}

#[tokio::test]
async fn test_uncategorized_text_is_accepted_then_dropped() {
    let test = TestPipeline::started(2, 2);
    let mut generator = TextGenerator::new();

    assert!(test.pipeline.submit(&generator.next_neutral()));
    assert!(test.pipeline.submit("I am happy"));
    test.wait_for_total(1, Duration::from_secs(5)).await;

    let pipeline = test.pipeline.clone();
    assert!(wait_until(Duration::from_secs(5), move || pipeline.stats().uncategorized == 1).await);

    let stats = test.pipeline.stats();
    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.categorized, 1);
    assert_eq!(test.store.text_count(), 1);

    test.pipeline.stop().await;
}

#[tokio::test]
async fn test_every_category_is_counted_once_per_match() {
    let test = TestPipeline::started(3, 2);
    let mut generator = TextGenerator::new();

    let texts: Vec<String> = (0..200).map(|_| generator.next_text()).collect();
    let expected: u64 = texts
        .iter()
        .map(|t| test.classifier.classify(t).len() as u64)
        .sum();

    for text in &texts {
        assert!(test.pipeline.enqueue(text).await.unwrap());
    }
    test.wait_for_total(expected, Duration::from_secs(10)).await;

    let all = test.store.fetch_sentiments().unwrap();
    let sum: u64 = all.values().map(|s| s.text_count).sum();
    assert_eq!(sum, expected);
    assert_eq!(test.store.total_texts(), expected);
    assert_eq!(test.store.text_count() as u64, expected);

    let value_sum: f64 = all.values().map(|s| s.value).sum();
    assert!((value_sum - 1.0).abs() < 1e-9, "values sum to {}", value_sum);

    let stats = test.pipeline.stats();
    assert_eq!(stats.store_faults, 0);
    assert_eq!(stats.update_faults, 0);

    test.pipeline.stop().await;
}
