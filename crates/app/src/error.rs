use ingest::{CalendarError, IngestError};
use serde::Serialize;
use thiserror::Error;
use units_core::QueryError;
use units_db::DbError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("db error: {0}")]
    Db(#[from] DbError),
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),
    #[error("calendar error: {0}")]
    Calendar(#[from] CalendarError),
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Message(String),
}

impl AppError {
    /// Expected empty outcomes that are reported as "no content" rather than
    /// failures.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            Self::Db(DbError::NoResults)
                | Self::Calendar(CalendarError::NoEventsFound)
                | Self::Ingest(IngestError::Calendar(CalendarError::NoEventsFound))
                | Self::Ingest(IngestError::Db(DbError::NoResults))
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, code) = if err.is_no_data() {
            (204, Some("no_data".to_string()))
        } else {
            match err {
                AppError::InvalidInput(_) | AppError::Query(_) => {
                    (400, Some("invalid_input".to_string()))
                }
                AppError::NotFound(_) => (404, Some("not_found".to_string())),
                AppError::Db(_)
                | AppError::Ingest(_)
                | AppError::Calendar(_)
                | AppError::Io(_)
                | AppError::Message(_) => (500, None),
            }
        };
        Self {
            status,
            message: err.to_string(),
            code,
        }
    }
}
