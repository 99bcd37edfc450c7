//! HTTP routes

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{get_category_sentiment, get_metrics, get_sentiments, save_text, AppState};

/// Routes exposed by the service. Request and response bodies are JSON,
/// except for `/metrics`.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/text", post(save_text))
        .route("/sentiments", get(get_sentiments))
        .route("/sentiments/:category", get(get_category_sentiment))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}
