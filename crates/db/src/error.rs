#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("timestamp out of range: {0}ms")]
    InvalidTimestamp(i64),
    #[error("no results found for query")]
    NoResults,
}

pub type Result<T> = std::result::Result<T, DbError>;
