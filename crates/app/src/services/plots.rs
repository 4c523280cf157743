use chrono::{DateTime, Utc};
use ingest::{CalendarError, fill_gaps, parse_event, reduce};
use units_core::{Granularity, Plot};

use crate::error::Result;
use crate::services::{SharedConfig, SharedFetcher};

/// Builds plots straight from the calendar without touching the store.
#[derive(Clone)]
pub struct PlotsService {
    config: SharedConfig,
    fetcher: SharedFetcher,
}

impl PlotsService {
    pub(super) fn new(config: SharedConfig, fetcher: SharedFetcher) -> Self {
        Self { config, fetcher }
    }

    /// Fails with [`CalendarError::NoEventsFound`] when nothing in the
    /// calendar could be parsed.
    pub fn run(&self, granularity: Granularity) -> Result<Vec<Plot>> {
        let events = self.fetcher.fetch(DateTime::<Utc>::UNIX_EPOCH)?;
        let mut parsed = Vec::with_capacity(events.total());
        for (index, item) in events.enumerate() {
            match item.map_err(|err| err.to_string()).and_then(|event| {
                parse_event(&event).map_err(|err| err.to_string())
            }) {
                Ok(event) => parsed.push(event),
                Err(message) => tracing::warn!(index, error = %message, "skipping event"),
            }
        }
        let totals = reduce(&parsed, granularity, self.config.unknown_default);
        if totals.is_empty() {
            return Err(CalendarError::NoEventsFound.into());
        }
        Ok(fill_gaps(&totals))
    }
}
