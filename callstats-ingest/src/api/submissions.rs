//! Ledger queries

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::models::IngestState;
use crate::services::Location;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SubmissionStatus {
    pub filename: String,
    pub submitted_at: String,
    pub state: IngestState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Folders currently holding the file; one entry once routing completed
    pub locations: Vec<Location>,
}

/// GET /submissions
pub async fn list_submissions(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let names = state.pipeline.ledger().filenames().await?;
    Ok(Json(names))
}

/// GET /submissions/:filename
pub async fn get_submission(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<SubmissionStatus>> {
    let entry = state
        .pipeline
        .ledger()
        .status(&filename)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} was never submitted", filename)))?;

    let locations = state.pipeline.router().locate(&entry.filename).await;

    Ok(Json(SubmissionStatus {
        filename: entry.filename,
        submitted_at: entry.submitted_at,
        state: entry.state,
        reason: entry.reason,
        locations,
    }))
}

/// Build ledger routes
pub fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/submissions", get(list_submissions))
        .route("/submissions/:filename", get(get_submission))
}
