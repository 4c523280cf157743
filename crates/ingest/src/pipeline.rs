use std::time::Instant;

use chrono::{DateTime, Days, SecondsFormat, Utc};
use units_core::Record;
use units_db::{DbError, Storer};

use crate::calendar::Fetcher;
use crate::parser::parse_event;
use crate::types::{CalendarError, CollectIssue, CollectOutcome, CollectStats, Result};

/// Tag carrying the event label on every stored record.
pub const SUMMARY_TAG: &str = "summary";

/// Where the next collection cycle starts: the override when given,
/// otherwise one day past the newest stored record, or the epoch for an
/// empty store.
pub fn resolve_collect_start<S: Storer + ?Sized>(
    store: &S,
    start_override: Option<DateTime<Utc>>,
) -> Result<DateTime<Utc>> {
    if let Some(start) = start_override {
        return Ok(start);
    }
    match store.read_last_timestamp() {
        Ok(last) => Ok(last + Days::new(1)),
        Err(DbError::NoResults) => Ok(DateTime::<Utc>::UNIX_EPOCH),
        Err(err) => Err(err.into()),
    }
}

/// Runs one collection cycle: fetch everything since the resume point, parse
/// each event and persist the batch in a single write.
pub fn collect_events<S: Storer + ?Sized>(
    store: &mut S,
    fetcher: &dyn Fetcher,
    start_override: Option<DateTime<Utc>>,
    unknown_default: f64,
) -> Result<CollectOutcome> {
    let started = Instant::now();
    let start = resolve_collect_start(store, start_override)?;
    let start_time = start.to_rfc3339_opts(SecondsFormat::Secs, true);
    tracing::info!(start = %start_time, "collecting calendar events");

    let events = match fetcher.fetch(start) {
        Ok(events) => events,
        Err(CalendarError::NoEventsFound) => {
            tracing::info!(since = %start_time, "no new calendar events");
            return Ok(CollectOutcome::NothingNew { since: start_time });
        }
        Err(err) => return Err(err.into()),
    };

    let mut stats = CollectStats {
        start_time,
        ..CollectStats::default()
    };
    let mut records = Vec::with_capacity(events.total());
    for (index, item) in events.enumerate() {
        stats.events_fetched += 1;
        let event = match item {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping unreadable calendar item");
                stats.events_skipped += 1;
                stats.issues.push(CollectIssue {
                    index,
                    summary: None,
                    message: err.to_string(),
                });
                continue;
            }
        };
        match parse_event(&event) {
            Ok(parsed) => records.push(
                Record::units(parsed.date, parsed.quantity.resolve(unknown_default))
                    .with_tag(SUMMARY_TAG, &event.summary),
            ),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping unparseable event");
                stats.events_skipped += 1;
                stats.issues.push(CollectIssue {
                    index,
                    summary: Some(event.summary.clone()),
                    message: err.to_string(),
                });
            }
        }
    }

    if !records.is_empty() {
        stats.records_stored = store.store(&records)?;
    }
    tracing::info!(
        fetched = stats.events_fetched,
        skipped = stats.events_skipped,
        stored = stats.records_stored,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "collection finished"
    );
    Ok(CollectOutcome::Collected(stats))
}
