//! Summary table operations

use sqlx::{SqliteConnection, SqlitePool};
use callstats_common::Result;

use crate::models::{ReportingPeriod, SummaryRecord};

/// Insert one summary row
pub async fn save_summary(conn: &mut SqliteConnection, record: &SummaryRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO summary (time_period, calls_offered, abandoned_after_30, fcr, dsat, csat)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.time_period)
    .bind(record.calls_offered)
    .bind(record.abandoned_after_30)
    .bind(record.fcr)
    .bind(record.dsat)
    .bind(record.csat)
    .execute(conn)
    .await?;

    Ok(())
}

/// First stored summary row within the period's month
pub async fn get_summary_entry(
    pool: &SqlitePool,
    period: ReportingPeriod,
) -> Result<Option<SummaryRecord>> {
    let (from, to) = period.lookup_bounds();

    let record = sqlx::query_as::<_, SummaryRecord>(
        r#"
        SELECT time_period, calls_offered, abandoned_after_30, fcr, dsat, csat
        FROM summary
        WHERE time_period BETWEEN ? AND ?
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Count stored summary rows
pub async fn count_summary(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM summary")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
