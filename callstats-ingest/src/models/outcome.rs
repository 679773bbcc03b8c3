//! Result of one ingestion pass, as handed to the HTTP layer

use serde::{Deserialize, Serialize};

use super::{ReportingPeriod, SummaryView, VocView};

/// Why a submission reached ERRORED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// Filename does not encode a recognizable month/year
    PeriodError,
    /// Workbook unreadable, or sheet set is not exactly the required set
    ShapeInvalid,
    /// A field failed its domain constraint, or a VOC header was not a date
    RowInvalid,
    /// The record store rejected or failed a write
    WriteFailure,
    /// The file could not be moved to its terminal location
    RouterFailure,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::PeriodError => "PERIOD_ERROR",
            FailureKind::ShapeInvalid => "SHAPE_INVALID",
            FailureKind::RowInvalid => "ROW_INVALID",
            FailureKind::WriteFailure => "WRITE_FAILURE",
            FailureKind::RouterFailure => "ROUTER_FAILURE",
        }
    }

    /// Caused by the submitted file rather than by this service
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            FailureKind::PeriodError | FailureKind::ShapeInvalid | FailureKind::RowInvalid
        )
    }
}

/// Stored data for the submission's reporting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestSuccess {
    pub filename: String,
    pub period: ReportingPeriod,
    /// Absent when the workbook carries no summary row for its own period
    pub summary_view: Option<SummaryView>,
    /// Absent when the workbook carries no VOC column for its own period
    pub voc_view: Option<VocView>,
    pub summary_rows: usize,
    pub voc_columns: usize,
}

/// Tagged outcome of `IngestPipeline::ingest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// Rows committed and file archived
    Success(IngestSuccess),
    /// Filename already in the ledger; upload discarded
    Duplicate { filename: String, message: String },
    /// No file given; ledger untouched
    Rejected { message: String },
    /// File moved to error; no rows from it persisted
    Failure { kind: FailureKind, message: String },
}

impl IngestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, IngestOutcome::Success(_))
    }

    /// Short human-readable line suitable for direct display
    pub fn message(&self) -> String {
        match self {
            IngestOutcome::Success(success) => format!(
                "{} processed: {} summary rows, {} VOC columns stored",
                success.filename, success.summary_rows, success.voc_columns
            ),
            IngestOutcome::Duplicate { message, .. }
            | IngestOutcome::Rejected { message }
            | IngestOutcome::Failure { message, .. } => message.clone(),
        }
    }
}
