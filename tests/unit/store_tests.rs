//! Aggregate-update behavior through the public store API

use std::sync::Arc;

use sentiment_pipeline::types::{Category, Sentiment, SentimentMap};
use sentiment_pipeline::{Error, MemoryStore, PanasClassifier, SentimentStore};

fn classifier() -> Arc<PanasClassifier> {
    Arc::new(PanasClassifier::new())
}

#[test]
fn test_second_category_dilutes_first() {
    let mut seed = SentimentMap::new();
    seed.insert(Category::from("jovility"), Sentiment::new(0.5, 1));
    let store = MemoryStore::seeded(classifier(), seed);

    let updated = store.update_sentiment(&Category::from("sadness"), 1).unwrap();

    assert_eq!(updated.text_count, 1);
    assert_eq!(store.total_texts(), 2);

    let all = store.fetch_sentiments().unwrap();
    assert_eq!(all.get("jovility").unwrap().text_count, 1);
    assert!((all.get("jovility").unwrap().value - 0.25).abs() < 1e-12);
    assert!((all.get("sadness").unwrap().value - 0.5).abs() < 1e-12);
}

#[test]
fn test_repeated_updates_track_share() {
    let store = MemoryStore::new(classifier());
    let jovility = Category::from("jovility");
    let fear = Category::from("fear");

    for _ in 0..3 {
        store.update_sentiment(&jovility, 1).unwrap();
    }
    store.update_sentiment(&fear, 1).unwrap();

    let all = store.fetch_sentiments().unwrap();
    // jovility: 3/3 rescaled by 3/4
    assert!((all[&jovility].value - 0.75).abs() < 1e-12);
    assert!((all[&fear].value - 0.25).abs() < 1e-12);
    assert_eq!(store.total_texts(), 4);
}

#[test]
fn test_unknown_category_lookup() {
    let store = MemoryStore::new(classifier());
    let err = store.fetch_category_sentiment("nostalgia").unwrap_err();

    assert!(err.is_not_found());
    if let Error::CategoryNotFound { sentiment, .. } = err {
        assert_eq!(sentiment, Sentiment::default());
    }
}

#[test]
fn test_queries_are_idempotent() {
    let store = MemoryStore::new(classifier());
    store.update_sentiment(&Category::from("guilt"), 1).unwrap();
    store.update_sentiment(&Category::from("shyness"), 1).unwrap();

    let snapshots: Vec<_> = (0..5).map(|_| store.fetch_sentiments().unwrap()).collect();
    assert!(snapshots.windows(2).all(|w| w[0] == w[1]));
}
