//! Report upload endpoint
//!
//! POST /upload takes a multipart form with the workbook in field `file` and
//! answers with the pipeline's tagged outcome plus a display `message`.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::models::{FailureKind, IngestOutcome};
use crate::services::UploadedFile;
use crate::AppState;

/// Multipart field carrying the workbook
pub const UPLOAD_FIELD: &str = "file";

/// Largest accepted request body
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// HTTP status for an ingest outcome
pub fn outcome_status(outcome: &IngestOutcome) -> StatusCode {
    match outcome {
        IngestOutcome::Success(_) => StatusCode::OK,
        IngestOutcome::Duplicate { .. } => StatusCode::CONFLICT,
        IngestOutcome::Rejected { .. } => StatusCode::BAD_REQUEST,
        IngestOutcome::Failure { kind, .. } => match kind {
            FailureKind::PeriodError | FailureKind::ShapeInvalid | FailureKind::RowInvalid => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            FailureKind::WriteFailure | FailureKind::RouterFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        },
    }
}

/// POST /upload
pub async fn upload_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    // A form without the file field is treated like an unnamed file
    let mut upload = UploadedFile::new("", Vec::new());

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        upload = UploadedFile::new(filename, content.to_vec());
        break;
    }

    let outcome = state.pipeline.ingest(upload).await;

    if let IngestOutcome::Failure { message, .. } = &outcome {
        *state.last_error.write().await = Some(message.clone());
    }

    let status = outcome_status(&outcome);
    let mut body =
        serde_json::to_value(&outcome).map_err(|e| ApiError::Internal(e.to_string()))?;
    if let Some(fields) = body.as_object_mut() {
        fields.insert("message".to_string(), Value::String(outcome.message()));
    }

    Ok((status, Json(body)))
}

/// Build upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_report))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
