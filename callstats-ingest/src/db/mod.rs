//! Record store for callstats-ingest
//!
//! Summary and VOC rows are written only through `write_submission`, inside
//! a transaction owned by the caller, so one submission's rows commit or roll
//! back together.

pub mod summary;
pub mod voc;

use sqlx::{Sqlite, SqlitePool, Transaction};
use callstats_common::Result;

use crate::models::{SummaryRecord, VocRecord};

/// Write every row of one submission inside `tx`
///
/// Nothing is visible to other connections until the caller commits.
pub async fn write_submission(
    tx: &mut Transaction<'_, Sqlite>,
    summary_rows: &[SummaryRecord],
    voc_rows: &[VocRecord],
) -> Result<()> {
    for record in summary_rows {
        summary::save_summary(&mut **tx, record).await?;
    }
    for record in voc_rows {
        voc::save_voc(&mut **tx, record).await?;
    }
    Ok(())
}

/// Persist one submission in its own transaction and commit
pub async fn save_submission(
    pool: &SqlitePool,
    summary_rows: &[SummaryRecord],
    voc_rows: &[VocRecord],
) -> Result<()> {
    let mut tx = pool.begin().await?;
    write_submission(&mut tx, summary_rows, voc_rows).await?;
    tx.commit().await?;
    Ok(())
}
