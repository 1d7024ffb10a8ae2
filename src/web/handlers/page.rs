// GET / — the topic viewer page.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use super::load_failure;
use crate::topics::summary;
use crate::web::render::{render_page, PageBody};
use crate::web::AppState;

pub async fn index(State(state): State<AppState>) -> Response {
    let artifacts = match state.cache.get().await {
        Ok(a) => a,
        Err(e) => {
            let (status, message) = load_failure(&e);
            return (status, Html(render_page(&PageBody::Error(&message)).into_string())).into_response();
        }
    };

    match summary::summarize(&artifacts.model, &artifacts.vectorizer, state.top_terms) {
        Ok(topics) => Html(render_page(&PageBody::Topics {
            topics: &topics,
            sample_size: artifacts.vectorizer.n_documents(),
        })
        .into_string())
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to summarize topics");
            let message = format!("Could not summarize topics: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_page(&PageBody::Error(&message)).into_string()),
            )
                .into_response()
        }
    }
}
