use std::io;

use serde::Serialize;

/// Why a single calendar event could not be turned into a [`units_core::ParsedEvent`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no usable start date for event {summary:?}")]
    MissingDate { summary: String },
    #[error("failed to find a units number in {summary:?}")]
    NoQuantity { summary: String },
    #[error("failed to parse units number {matched:?} in {summary:?}")]
    MalformedQuantity { summary: String, matched: String },
}

/// Failures reported by a calendar [`crate::Fetcher`].
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("no events found")]
    NoEventsFound,
    #[error("calendar not found: {0}")]
    CalendarNotFound(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("calendar item error: {0}")]
    Item(String),
}

/// Summary of one collection cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectStats {
    pub start_time: String,
    pub events_fetched: usize,
    pub events_skipped: usize,
    pub records_stored: usize,
    pub issues: Vec<CollectIssue>,
}

/// Non-fatal problems encountered while collecting.
#[derive(Debug, Clone, Serialize)]
pub struct CollectIssue {
    pub index: usize,
    pub summary: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CollectOutcome {
    /// The calendar had nothing at or after `since`.
    NothingNew { since: String },
    Collected(CollectStats),
}

impl CollectOutcome {
    pub fn records_stored(&self) -> usize {
        match self {
            Self::NothingNew { .. } => 0,
            Self::Collected(stats) => stats.records_stored,
        }
    }
}

/// Errors emitted by the collection pipeline.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("calendar error: {0}")]
    Calendar(#[from] CalendarError),
    #[error("db error: {0}")]
    Db(#[from] units_db::DbError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
