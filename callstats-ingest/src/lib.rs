//! callstats-ingest library interface
//!
//! Ingests monthly call-center report workbooks: ledger gate, validation,
//! atomic persistence and archive/error routing. The binary wraps this in an
//! HTTP service and an operator CLI.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::services::IngestPipeline;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Ingestion pipeline bound to the same pool and the root folder layout
    pub pipeline: Arc<IngestPipeline>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last failed ingest, for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, pipeline: IngestPipeline) -> Self {
        Self {
            db,
            pipeline: Arc::new(pipeline),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::upload_routes())
        .merge(api::results_routes())
        .merge(api::submission_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
