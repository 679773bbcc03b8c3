//! Temporary root folder, database and pipeline

use callstats_common::config::FolderLayout;
use callstats_common::db::init_database;
use callstats_ingest::db::{summary, voc};
use callstats_ingest::services::IngestPipeline;
use sqlx::SqlitePool;
use tempfile::TempDir;

pub struct TestEnv {
    /// Removed on drop
    pub dir: TempDir,
    pub layout: FolderLayout,
    pub db: SqlitePool,
    pub pipeline: IngestPipeline,
}

/// Fresh root folder with inbox/archive/error and an on-disk database
pub async fn test_env() -> TestEnv {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let layout = FolderLayout::new(dir.path());
    layout
        .ensure_directories()
        .expect("Failed to create folder layout");

    let db = init_database(&layout.database)
        .await
        .expect("Failed to initialize database");
    let pipeline = IngestPipeline::new(db.clone(), &layout);

    TestEnv {
        dir,
        layout,
        db,
        pipeline,
    }
}

/// (summary rows, voc rows) currently stored
pub async fn stored_row_counts(db: &SqlitePool) -> (i64, i64) {
    (
        summary::count_summary(db).await.expect("count summary"),
        voc::count_voc(db).await.expect("count voc"),
    )
}
