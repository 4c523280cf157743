use chrono::{DateTime, Utc};
use units_core::{Record, UNITS_FIELD, WindowRequest, WindowRow};

use crate::Db;
use crate::error::{DbError, Result};

/// Storage capability consumed by collection and querying.
///
/// `query` and the timestamp readers report an empty result set as
/// [`DbError::NoResults`] rather than an empty success.
pub trait Storer {
    /// Persists a batch. An empty batch is a no-op.
    fn store(&mut self, records: &[Record]) -> Result<usize>;
    fn query(&self, request: &WindowRequest<'_>) -> Result<Vec<WindowRow>>;
    fn read_first_timestamp(&self) -> Result<DateTime<Utc>>;
    fn read_last_timestamp(&self) -> Result<DateTime<Utc>>;
}

impl Storer for Db {
    fn store(&mut self, records: &[Record]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        tracing::info!(count = records.len(), "storing records");
        self.insert_records(records)
    }

    fn query(&self, request: &WindowRequest<'_>) -> Result<Vec<WindowRow>> {
        tracing::debug!(
            start = %request.start,
            stop = %request.stop,
            every = %request.window.every,
            offset_hours = request.window.offset.num_hours(),
            "executing window aggregation"
        );
        let rows = self.aggregate_window(request)?;
        if rows.is_empty() {
            return Err(DbError::NoResults);
        }
        Ok(rows)
    }

    fn read_first_timestamp(&self) -> Result<DateTime<Utc>> {
        self.first_timestamp(UNITS_FIELD)?.ok_or(DbError::NoResults)
    }

    fn read_last_timestamp(&self) -> Result<DateTime<Utc>> {
        self.last_timestamp(UNITS_FIELD)?.ok_or(DbError::NoResults)
    }
}
