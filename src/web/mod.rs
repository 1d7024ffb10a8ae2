// Web server — Axum-based topic viewer.
//
// `/` renders the topic page server-side from the cached artifacts;
// `/api/topics` serves the same summary as JSON. The stylesheet is embedded
// at compile time via include_dir!.

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::extract::Path;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use include_dir::{include_dir, Dir};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::artifacts::cache::ArtifactCache;
use crate::artifacts::ArtifactPaths;
use crate::config::Config;

pub mod handlers;
pub mod render;

static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/web/static");

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ArtifactCache>,
    /// Terms shown per topic
    pub top_terms: usize,
}

impl AppState {
    pub fn new(cache: Arc<ArtifactCache>, top_terms: usize) -> Self {
        Self { cache, top_terms }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(config: Config, port: u16, bind: &str) -> Result<()> {
    let cache = Arc::new(ArtifactCache::new(
        ArtifactPaths::in_dir(&config.artifact_dir),
        config.params.n_topics,
    ));

    // Load up front so the first page view doesn't pay for it. Missing
    // artifacts are not fatal: the page shows an error until training runs.
    if let Err(e) = cache.get().await {
        warn!(error = %e, "Artifacts not available at startup");
    }

    let app = build_router(AppState::new(cache, config.params.top_terms));

    let addr = format!("{bind}:{port}");
    info!("Topic viewer listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::page::index))
        .route("/api/topics", get(handlers::topics::list_topics))
        .route("/api/reload", post(handlers::topics::reload))
        .route("/health", get(health))
        .route("/static/{*path}", get(serve_static))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check — always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Serve an embedded static asset.
async fn serve_static(Path(path): Path<String>) -> Response {
    match ASSETS.get_file(&path) {
        Some(file) => asset_response(file.contents(), &path),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn asset_response(contents: &'static [u8], path: &str) -> Response {
    let mime = mime_type(path);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(mime))
        .body(Body::from(contents))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn mime_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
