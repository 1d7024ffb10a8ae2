// Route handlers. Both the page and the JSON API read through the shared
// artifact cache and map load failures the same way.

use axum::http::StatusCode;

use crate::error::PipelineError;

pub mod page;
pub mod topics;

/// Status code and user-facing message for a failed artifact load.
pub(crate) fn load_failure(err: &anyhow::Error) -> (StatusCode, String) {
    match PipelineError::find(err) {
        Some(PipelineError::MissingArtifact { path }) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!(
                "Required model file not found ({}). Run `newstopics train` first, then reload this page.",
                path.display()
            ),
        ),
        _ => {
            tracing::error!(error = %err, "Failed to load artifacts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("The trained artifacts could not be loaded: {err:#}"),
            )
        }
    }
}
