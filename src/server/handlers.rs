//! HTTP handlers

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::pipeline::Pipeline;
use crate::types::{Category, SentimentMap};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTextRequest {
    #[serde(alias = "TextString")]
    pub text_string: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SaveTextResponse {
    pub saved: bool,
}

/// Body of a lookup for a category outside the classifier's set
#[derive(Debug, Deserialize, Serialize)]
pub struct CategoryErrorResponse {
    pub error: String,
    pub sentiments: SentimentMap,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(message.into())).into_response()
}

/// `POST /text`: validate a text and hand it to the pipeline
pub async fn save_text(
    State(state): State<AppState>,
    payload: Result<Json<SaveTextRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(rejection.status(), rejection.body_text()),
    };

    if req.text_string.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Invalid body params");
    }

    let saved = state.pipeline.submit(&req.text_string);
    Json(SaveTextResponse { saved }).into_response()
}

/// `GET /sentiments`
pub async fn get_sentiments(State(state): State<AppState>) -> Response {
    match state.pipeline.sentiments() {
        Ok(sentiments) => Json(sentiments).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// `GET /sentiments/:category`
pub async fn get_category_sentiment(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Response {
    match state.pipeline.category_sentiment(&category) {
        Ok(sentiment) => {
            let mut body = SentimentMap::new();
            body.insert(Category::from(category), sentiment);
            Json(body).into_response()
        }
        Err(err) => match &err {
            Error::CategoryNotFound {
                category,
                sentiment,
            } => {
                let mut sentiments = SentimentMap::new();
                sentiments.insert(category.clone(), *sentiment);
                let body = CategoryErrorResponse {
                    error: err.to_string(),
                    sentiments,
                };
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            _ => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        },
    }
}

/// `GET /metrics`: Prometheus text exposition
pub async fn get_metrics(State(state): State<AppState>) -> Response {
    match state.pipeline.metrics().encode() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
