// GET /api/topics — topic summaries as JSON.
// POST /api/reload — drop cached artifacts so the next request rereads them.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::load_failure;
use crate::topics::summary;
use crate::web::{api_error, AppState};

pub async fn list_topics(State(state): State<AppState>) -> Response {
    let artifacts = match state.cache.get().await {
        Ok(a) => a,
        Err(e) => {
            let (status, message) = load_failure(&e);
            return api_error(status, &message);
        }
    };

    match summary::summarize(&artifacts.model, &artifacts.vectorizer, state.top_terms) {
        Ok(topics) => Json(serde_json::json!({
            "documents": artifacts.vectorizer.n_documents(),
            "vocabulary_size": artifacts.vectorizer.vocabulary_size(),
            "topics": topics,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to summarize topics");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not summarize topics")
        }
    }
}

pub async fn reload(State(state): State<AppState>) -> impl IntoResponse {
    state.cache.invalidate().await;
    match state.cache.get().await {
        Ok(_) => Json(serde_json::json!({ "reloaded": true })),
        Err(e) => {
            let (_, message) = load_failure(&e);
            tracing::warn!(error = %e, "Artifact reload failed");
            Json(serde_json::json!({ "reloaded": false, "error": message }))
        }
    }
}
