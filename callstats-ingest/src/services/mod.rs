//! Ingestion components, leaf-first
//!
//! The pipeline drives the rest; everything else is usable on its own.

pub mod file_router;
pub mod ingest_pipeline;
pub mod period_extractor;
pub mod row_validator;
pub mod submission_ledger;
pub mod workbook;

pub use file_router::{sanitize_filename, FileRouter, Location, RouterError};
pub use ingest_pipeline::{IngestPipeline, UploadedFile};
pub use period_extractor::PeriodError;
pub use row_validator::{ValidationOutcome, VocHeaderError};
pub use submission_ledger::{LedgerEntry, SubmissionLedger};
pub use workbook::{has_required_sheets, Workbook, WorkbookError};
