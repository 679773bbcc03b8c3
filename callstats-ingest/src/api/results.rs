//! Stored data for one reporting period

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::{summary, voc};
use crate::error::{ApiError, ApiResult};
use crate::models::{ReportingPeriod, SummaryView, VocView};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PeriodResults {
    /// e.g. "January 2018"
    pub period: String,
    pub summary: Option<SummaryView>,
    pub voc: Option<VocView>,
}

/// GET /results/:year/:month
pub async fn get_results(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Json<PeriodResults>> {
    let period = ReportingPeriod::new(year, month)
        .ok_or_else(|| ApiError::BadRequest(format!("No such month: {}-{}", year, month)))?;

    let summary = summary::get_summary_entry(&state.db, period).await?;
    let voc = voc::get_voc_entry(&state.db, period).await?;

    if summary.is_none() && voc.is_none() {
        return Err(ApiError::NotFound(format!("No data stored for {}", period)));
    }

    Ok(Json(PeriodResults {
        period: period.to_string(),
        summary: summary.map(|r| r.as_view()),
        voc: voc.map(|r| r.as_view()),
    }))
}

/// Build results routes
pub fn results_routes() -> Router<AppState> {
    Router::new().route("/results/:year/:month", get(get_results))
}
