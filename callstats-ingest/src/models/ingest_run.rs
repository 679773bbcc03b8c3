//! Ingestion state machine
//!
//! One submitted file moves through:
//! RECEIVED → FRESH → PERIOD_OK → SHAPE_OK → ALL_VALID → ALL_WRITTEN → ARCHIVED
//!
//! DUPLICATE and ERRORED are the other terminal states. Any non-terminal
//! state after FRESH may fall to ERRORED.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ingestion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestState {
    /// Upload received, ledger not yet consulted
    Received,
    /// Filename already in the ledger; nothing moved
    Duplicate,
    /// Filename newly marked in the ledger, bytes staged in the inbox
    Fresh,
    /// Reporting period derived from the filename
    PeriodOk,
    /// Workbook has exactly the required sheets
    ShapeOk,
    /// Every summary row and VOC column validated
    AllValid,
    /// Rows written (transaction pending commit)
    AllWritten,
    /// File in archive, rows committed
    Archived,
    /// File in error, no rows from this submission persisted
    Errored,
}

impl IngestState {
    /// Name stored in the ledger's state column
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestState::Received => "RECEIVED",
            IngestState::Duplicate => "DUPLICATE",
            IngestState::Fresh => "FRESH",
            IngestState::PeriodOk => "PERIOD_OK",
            IngestState::ShapeOk => "SHAPE_OK",
            IngestState::AllValid => "ALL_VALID",
            IngestState::AllWritten => "ALL_WRITTEN",
            IngestState::Archived => "ARCHIVED",
            IngestState::Errored => "ERRORED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IngestState::Duplicate | IngestState::Archived | IngestState::Errored
        )
    }
}

impl std::str::FromStr for IngestState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let state = match s {
            "RECEIVED" => IngestState::Received,
            "DUPLICATE" => IngestState::Duplicate,
            "FRESH" => IngestState::Fresh,
            "PERIOD_OK" => IngestState::PeriodOk,
            "SHAPE_OK" => IngestState::ShapeOk,
            "ALL_VALID" => IngestState::AllValid,
            "ALL_WRITTEN" => IngestState::AllWritten,
            "ARCHIVED" => IngestState::Archived,
            "ERRORED" => IngestState::Errored,
            other => return Err(format!("Unknown ingest state: {}", other)),
        };
        Ok(state)
    }
}

/// State transition event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub run_id: Uuid,
    pub old_state: IngestState,
    pub new_state: IngestState,
    pub transitioned_at: DateTime<Utc>,
}

/// One pass of a file through the pipeline (in-memory only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRun {
    /// Correlates log lines of one submission
    pub run_id: Uuid,
    pub filename: String,
    pub state: IngestState,
    pub transitions: Vec<StateTransition>,
    pub started_at: DateTime<Utc>,
    /// Set on entering a terminal state
    pub ended_at: Option<DateTime<Utc>>,
}

impl IngestRun {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            filename: filename.into(),
            state: IngestState::Received,
            transitions: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Transition to new state
    pub fn transition_to(&mut self, new_state: IngestState) -> StateTransition {
        let transition = StateTransition {
            run_id: self.run_id,
            old_state: self.state,
            new_state,
            transitioned_at: Utc::now(),
        };
        self.state = new_state;

        if new_state.is_terminal() {
            self.ended_at = Some(transition.transitioned_at);
        }

        tracing::debug!(
            run_id = %self.run_id,
            filename = %self.filename,
            from = transition.old_state.as_str(),
            to = new_state.as_str(),
            "Ingest state transition"
        );

        self.transitions.push(transition.clone());
        transition
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
