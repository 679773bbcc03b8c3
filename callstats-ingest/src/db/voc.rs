//! VOC table operations

use sqlx::{SqliteConnection, SqlitePool};
use callstats_common::Result;

use crate::models::{ReportingPeriod, VocRecord};

/// Insert one VOC row
pub async fn save_voc(conn: &mut SqliteConnection, record: &VocRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO voc (time_period, promoters, passives, detractors)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(record.time_period)
    .bind(record.promoters)
    .bind(record.passives)
    .bind(record.detractors)
    .execute(conn)
    .await?;

    Ok(())
}

/// First stored VOC row within the period's month
pub async fn get_voc_entry(pool: &SqlitePool, period: ReportingPeriod) -> Result<Option<VocRecord>> {
    let (from, to) = period.lookup_bounds();

    let record = sqlx::query_as::<_, VocRecord>(
        r#"
        SELECT time_period, promoters, passives, detractors
        FROM voc
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

/// Count stored VOC rows
pub async fn count_voc(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM voc")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::save_submission;
    use crate::models::SummaryRecord;
    use callstats_common::db::init_memory_database;
    use chrono::NaiveDate;

    fn voc(month: u32) -> VocRecord {
        VocRecord {
            time_period: NaiveDate::from_ymd_opt(2018, month, 1).unwrap(),
            promoters: 10,
            passives: 5,
            detractors: 1,
        }
    }

    #[tokio::test]
    async fn save_submission_commits_both_tables() {
        let pool = init_memory_database().await.unwrap();
        let summary = SummaryRecord {
            time_period: NaiveDate::from_ymd_opt(2018, 2, 1).unwrap(),
            calls_offered: 5,
            abandoned_after_30: 0.0,
            fcr: 0.0,
            dsat: 0.0,
            csat: 0.0,
        };

        save_submission(&pool, &[summary], &[voc(2), voc(3)]).await.unwrap();

        assert_eq!(count_voc(&pool).await.unwrap(), 2);
        assert_eq!(
            get_voc_entry(&pool, ReportingPeriod::new(2018, 3).unwrap()).await.unwrap(),
            Some(voc(3))
        );
    }

    #[tokio::test]
    async fn failed_submission_leaves_nothing() {
        let pool = init_memory_database().await.unwrap();
        let bad = VocRecord {
            detractors: -1,
            ..voc(4)
        };

        // CHECK constraint rejects the second row; the first must roll back too
        let result = save_submission(&pool, &[], &[voc(4), bad]).await;

        assert!(result.is_err());
        assert_eq!(count_voc(&pool).await.unwrap(), 0);
    }
}
