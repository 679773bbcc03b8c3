//! Ingestion pipeline orchestrator
//!
//! Sequences one uploaded report through:
//! ledger → stage in inbox → period → shape → rows → store → archive.
//!
//! Any failure after staging routes the file to `error/`. Rows are written in
//! one transaction that commits only after the archive rename succeeded, so a
//! submission either ends archived with all rows stored or in error with none.

use callstats_common::config::FolderLayout;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::db;
use crate::models::{
    FailureKind, IngestOutcome, IngestRun, IngestState, IngestSuccess, ReportingPeriod,
    SummaryRecord, VocRecord,
};
use crate::services::file_router::{sanitize_filename, FileRouter, Location};
use crate::services::period_extractor;
use crate::services::row_validator::{validate_summary_sheet, validate_voc_sheet, ValidationOutcome};
use crate::services::submission_ledger::SubmissionLedger;
use crate::services::workbook::{has_required_sheets, Workbook, SUMMARY_SHEET, VOC_SHEET};

/// Violations kept in the ledger's reason column
const MAX_REASON_VIOLATIONS: usize = 5;

/// A received file: original filename plus content
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// A step failed; the file still sits in `location`
struct StepFailure {
    kind: FailureKind,
    message: String,
    /// Logged and stored in the ledger, not shown to the uploader
    detail: String,
    location: Location,
}

impl StepFailure {
    fn new(kind: FailureKind, message: String, detail: impl Into<String>) -> Self {
        Self {
            kind,
            message,
            detail: detail.into(),
            location: Location::Inbox,
        }
    }
}

/// Rows that passed validation, ready to store
struct ValidatedReport {
    period: ReportingPeriod,
    summary_rows: Vec<SummaryRecord>,
    voc_rows: Vec<VocRecord>,
}

/// Runs the ingestion state machine against the shared ledger, store and folders
#[derive(Debug, Clone)]
pub struct IngestPipeline {
    db: SqlitePool,
    ledger: SubmissionLedger,
    router: FileRouter,
}

impl IngestPipeline {
    pub fn new(db: SqlitePool, layout: &FolderLayout) -> Self {
        Self {
            ledger: SubmissionLedger::new(db.clone()),
            router: FileRouter::new(layout),
            db,
        }
    }

    pub fn ledger(&self) -> &SubmissionLedger {
        &self.ledger
    }

    pub fn router(&self) -> &FileRouter {
        &self.router
    }

    /// Ingest one uploaded report and return its outcome
    pub async fn ingest(&self, upload: UploadedFile) -> IngestOutcome {
        let filename = sanitize_filename(&upload.filename);
        if filename.is_empty() {
            warn!(raw_filename = %upload.filename, "Rejected upload without a usable filename");
            return IngestOutcome::Rejected {
                message: "No file uploaded".to_string(),
            };
        }

        let mut run = IngestRun::new(&filename);
        info!(
            run_id = %run.run_id,
            filename = %filename,
            bytes = upload.content.len(),
            "Ingest started"
        );

        match self.ledger.has_been_submitted(&filename).await {
            Ok(false) => {}
            Ok(true) => {
                run.transition_to(IngestState::Duplicate);
                info!(run_id = %run.run_id, filename = %filename, "Duplicate submission discarded");
                return IngestOutcome::Duplicate {
                    message: format!("{} has already been processed", filename),
                    filename,
                };
            }
            Err(e) => {
                // Nothing staged and no ledger mark: the upload simply did not happen
                error!(run_id = %run.run_id, filename = %filename, error = %e, "Ledger check failed");
                run.transition_to(IngestState::Errored);
                return IngestOutcome::Failure {
                    kind: FailureKind::WriteFailure,
                    message: format!("Could not record submission of {}", filename),
                };
            }
        }

        if let Err(e) = self.router.stage(&filename, &upload.content).await {
            error!(run_id = %run.run_id, error = %e, "Staging upload failed");
            run.transition_to(IngestState::Errored);
            self.record(&run, Some(&e.to_string())).await;
            return IngestOutcome::Failure {
                kind: FailureKind::RouterFailure,
                message: format!("Could not store {} for processing", filename),
            };
        }
        run.transition_to(IngestState::Fresh);

        let result = match validate_off_runtime(&mut run, upload.content).await {
            Ok(report) => self.store_and_archive(&mut run, report).await,
            Err(failure) => Err(failure),
        };

        match result {
            Ok(success) => {
                self.record(&run, None).await;
                info!(
                    run_id = %run.run_id,
                    filename = %run.filename,
                    period = %success.period,
                    summary_rows = success.summary_rows,
                    voc_columns = success.voc_columns,
                    "Ingest archived"
                );
                IngestOutcome::Success(success)
            }
            Err(failure) => self.fail(&mut run, failure).await,
        }
    }

    /// Write rows, archive the file, then commit
    async fn store_and_archive(
        &self,
        run: &mut IngestRun,
        report: ValidatedReport,
    ) -> Result<IngestSuccess, StepFailure> {
        let filename = run.filename.clone();
        let write_failed = |detail: String| {
            StepFailure::new(
                FailureKind::WriteFailure,
                format!("Could not save the data in {}", filename),
                detail,
            )
        };

        let mut tx = self.db.begin().await.map_err(|e| write_failed(e.to_string()))?;
        if let Err(e) = db::write_submission(&mut tx, &report.summary_rows, &report.voc_rows).await {
            // Release the write lock before the ledger update on the failure path
            if let Err(rollback) = tx.rollback().await {
                error!(run_id = %run.run_id, error = %rollback, "Rollback after write failure failed");
            }
            return Err(write_failed(e.to_string()));
        }
        run.transition_to(IngestState::AllWritten);

        if let Err(e) = self.router.to_archive(&filename).await {
            if let Err(rollback) = tx.rollback().await {
                error!(run_id = %run.run_id, error = %rollback, "Rollback after archive failure failed");
            }
            return Err(StepFailure::new(
                FailureKind::RouterFailure,
                format!("Could not archive {}", filename),
                e.to_string(),
            ));
        }

        if let Err(e) = tx.commit().await {
            let mut failure = write_failed(e.to_string());
            failure.location = Location::Archive;
            return Err(failure);
        }
        run.transition_to(IngestState::Archived);

        let summary_view = self.lookup_summary(run, report.period).await;
        let voc_view = self.lookup_voc(run, report.period).await;

        Ok(IngestSuccess {
            filename,
            period: report.period,
            summary_view,
            voc_view,
            summary_rows: report.summary_rows.len(),
            voc_columns: report.voc_rows.len(),
        })
    }

    async fn lookup_summary(
        &self,
        run: &IngestRun,
        period: ReportingPeriod,
    ) -> Option<crate::models::SummaryView> {
        match db::summary::get_summary_entry(&self.db, period).await {
            Ok(record) => record.map(|r| r.as_view()),
            Err(e) => {
                warn!(run_id = %run.run_id, error = %e, "Summary lookup after ingest failed");
                None
            }
        }
    }

    async fn lookup_voc(
        &self,
        run: &IngestRun,
        period: ReportingPeriod,
    ) -> Option<crate::models::VocView> {
        match db::voc::get_voc_entry(&self.db, period).await {
            Ok(record) => record.map(|r| r.as_view()),
            Err(e) => {
                warn!(run_id = %run.run_id, error = %e, "VOC lookup after ingest failed");
                None
            }
        }
    }

    /// Route the file to error and report the failure
    async fn fail(&self, run: &mut IngestRun, failure: StepFailure) -> IngestOutcome {
        let mut kind = failure.kind;
        let mut message = failure.message;
        let mut detail = failure.detail;

        let moved = match failure.location {
            Location::Inbox => self.router.to_error(&run.filename).await,
            from => self.router.relocate(&run.filename, from, Location::Error).await,
        };
        if let Err(e) = moved {
            error!(
                run_id = %run.run_id,
                filename = %run.filename,
                error = %e,
                "Could not move failed report to error folder"
            );
            kind = FailureKind::RouterFailure;
            message = format!("Could not move {} to the error folder", run.filename);
            detail = format!("{}; {}", detail, e);
        }

        run.transition_to(IngestState::Errored);
        self.record(run, Some(&detail)).await;

        if kind.is_client_fault() {
            warn!(run_id = %run.run_id, filename = %run.filename, kind = kind.as_str(), %detail, "Ingest rejected");
        } else {
            error!(run_id = %run.run_id, filename = %run.filename, kind = kind.as_str(), %detail, "Ingest failed");
        }

        IngestOutcome::Failure { kind, message }
    }

    /// Store the run's terminal state in the ledger; failures are only logged
    async fn record(&self, run: &IngestRun, reason: Option<&str>) {
        if let Err(e) = self
            .ledger
            .record_outcome(&run.filename, run.state, reason)
            .await
        {
            warn!(run_id = %run.run_id, error = %e, "Could not record outcome in ledger");
        }
    }
}

/// Period, shape and row validation; no side effects besides state transitions
fn validate_report(run: &mut IngestRun, bytes: &[u8]) -> Result<ValidatedReport, StepFailure> {
    let filename = run.filename.clone();

    let period = period_extractor::extract(&filename).map_err(|e| {
        StepFailure::new(
            FailureKind::PeriodError,
            format!("Error: cannot tell the reporting month of {}", filename),
            e.to_string(),
        )
    })?;
    run.transition_to(IngestState::PeriodOk);

    let malformed = |detail: String| {
        StepFailure::new(
            FailureKind::ShapeInvalid,
            "Error: malformed spreadsheet".to_string(),
            detail,
        )
    };
    let workbook = Workbook::from_bytes(bytes).map_err(|e| malformed(e.to_string()))?;
    let sheet_names = workbook.sheet_names();
    if !has_required_sheets(&sheet_names) {
        return Err(malformed(format!("unexpected sheet set {:?}", sheet_names)));
    }
    run.transition_to(IngestState::ShapeOk);

    let summary_sheet = workbook.sheet(SUMMARY_SHEET).map_err(|e| malformed(e.to_string()))?;
    let voc_sheet = workbook.sheet(VOC_SHEET).map_err(|e| malformed(e.to_string()))?;

    let mut violations = Vec::new();
    let summary_rows = match validate_summary_sheet(summary_sheet) {
        ValidationOutcome::Valid(rows) => rows,
        ValidationOutcome::Invalid(found) => {
            violations.extend(found);
            Vec::new()
        }
    };
    let voc_rows = match validate_voc_sheet(voc_sheet) {
        Ok(ValidationOutcome::Valid(rows)) => rows,
        Ok(ValidationOutcome::Invalid(found)) => {
            violations.extend(found);
            Vec::new()
        }
        Err(header) => {
            violations.push(header.to_string());
            Vec::new()
        }
    };

    if !violations.is_empty() {
        warn!(
            run_id = %run.run_id,
            violations = violations.len(),
            first = %violations[0],
            "Row validation failed"
        );
        let shown = violations.len().min(MAX_REASON_VIOLATIONS);
        return Err(StepFailure::new(
            FailureKind::RowInvalid,
            format!("Some of the data in {} is invalid!", filename),
            violations[..shown].join("; "),
        ));
    }
    run.transition_to(IngestState::AllValid);

    Ok(ValidatedReport {
        period,
        summary_rows,
        voc_rows,
    })
}

/// Run `validate_report` on the blocking pool; `run` comes back advanced
async fn validate_off_runtime(
    run: &mut IngestRun,
    bytes: Vec<u8>,
) -> Result<ValidatedReport, StepFailure> {
    let mut advanced = run.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let result = validate_report(&mut advanced, &bytes);
        (advanced, result)
    })
    .await;

    match joined {
        Ok((advanced, result)) => {
            *run = advanced;
            result
        }
        Err(e) => Err(StepFailure::new(
            FailureKind::ShapeInvalid,
            "Error: malformed spreadsheet".to_string(),
            format!("workbook validation aborted: {}", e),
        )),
    }
}
