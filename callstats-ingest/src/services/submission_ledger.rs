//! Submission ledger (idempotency gate)
//!
//! Records every filename ever submitted. The check and the mark are one
//! `INSERT OR IGNORE` against the primary key, so two concurrent uploads of
//! the same name cannot both see "not yet seen".
//!
//! A filename is marked before validation runs. A file that later fails stays
//! "seen" and can only be resubmitted under a new name.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use callstats_common::Result;

use crate::models::IngestState;

/// One ledger row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub filename: String,
    pub submitted_at: String,
    /// Last recorded state; only informational
    pub state: IngestState,
    pub reason: Option<String>,
}

/// Ledger backed by the `submissions` table
#[derive(Debug, Clone)]
pub struct SubmissionLedger {
    db: SqlitePool,
}

impl SubmissionLedger {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Check-and-mark
    ///
    /// Returns `true` if the filename was already present. Otherwise records it
    /// and returns `false`. The insert is committed before returning.
    pub async fn has_been_submitted(&self, filename: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO submissions (filename, submitted_at, state)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(filename)
        .bind(Utc::now().to_rfc3339())
        .bind(IngestState::Received.as_str())
        .execute(&self.db)
        .await?;

        let already_seen = result.rows_affected() == 0;
        tracing::debug!(filename, already_seen, "Ledger check-and-mark");
        Ok(already_seen)
    }

    /// Record the state a submission ended in
    ///
    /// Does not create entries; the duplicate decision never reads this column.
    pub async fn record_outcome(
        &self,
        filename: &str,
        state: IngestState,
        reason: Option<&str>,
    ) -> Result<()> {
        sqlx::query("UPDATE submissions SET state = ?, reason = ? WHERE filename = ?")
            .bind(state.as_str())
            .bind(reason)
            .bind(filename)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// Look up one filename
    pub async fn status(&self, filename: &str) -> Result<Option<LedgerEntry>> {
        let row = sqlx::query(
            "SELECT filename, submitted_at, state, reason FROM submissions WHERE filename = ?",
        )
        .bind(filename)
        .fetch_optional(&self.db)
        .await?;

        row.map(|row| entry_from_row(&row)).transpose()
    }

    /// All filenames in submission order
    pub async fn filenames(&self) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT filename FROM submissions ORDER BY rowid")
            .fetch_all(&self.db)
            .await?;
        Ok(names)
    }

    /// Ledger as UTF-8 text, one filename per line (backup format)
    pub async fn export_lines(&self) -> Result<String> {
        let mut text = String::new();
        for name in self.filenames().await? {
            text.push_str(&name);
            text.push('\n');
        }
        Ok(text)
    }
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<LedgerEntry> {
    let state: String = row.try_get("state")?;
    let state = state
        .parse::<IngestState>()
        .map_err(callstats_common::Error::Internal)?;

    Ok(LedgerEntry {
        filename: row.try_get("filename")?,
        submitted_at: row.try_get("submitted_at")?,
        state,
        reason: row.try_get("reason")?,
    })
}
