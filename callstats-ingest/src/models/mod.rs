//! Data models for callstats-ingest
//!
//! - Reporting period derived from filenames
//! - Summary and VOC records with their display views
//! - Ingestion state machine and outcomes

pub mod ingest_run;
pub mod outcome;
pub mod period;
pub mod records;

pub use ingest_run::{IngestRun, IngestState, StateTransition};
pub use outcome::{FailureKind, IngestOutcome, IngestSuccess};
pub use period::ReportingPeriod;
pub use records::{SummaryRecord, SummaryView, VocRecord, VocView};
