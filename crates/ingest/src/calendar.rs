use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use units_core::RawEvent;

use crate::parser::resolve_date;
use crate::types::CalendarError;

/// Source of calendar events.
pub trait Fetcher: Send + Sync {
    /// Events starting at or after `start`, oldest first. Fails with
    /// [`CalendarError::NoEventsFound`] when nothing qualifies.
    fn fetch(&self, start: DateTime<Utc>) -> Result<EventIter, CalendarError>;
}

type EventItem = Result<RawEvent, CalendarError>;

/// Finite, single-pass sequence of fetched events. Item failures are yielded
/// in place and do not end the sequence.
pub struct EventIter {
    total: usize,
    inner: Box<dyn Iterator<Item = EventItem> + Send>,
}

impl EventIter {
    pub fn new(items: Vec<EventItem>) -> Self {
        Self {
            total: items.len(),
            inner: Box::new(items.into_iter()),
        }
    }

    /// Number of items the sequence was created with.
    pub fn total(&self) -> usize {
        self.total
    }
}

impl Iterator for EventIter {
    type Item = EventItem;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl std::fmt::Debug for EventIter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventIter")
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

/// In-memory calendar for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
    events: Vec<RawEvent>,
}

impl StaticCalendar {
    pub fn new(events: Vec<RawEvent>) -> Self {
        Self { events }
    }
}

impl Fetcher for StaticCalendar {
    fn fetch(&self, start: DateTime<Utc>) -> Result<EventIter, CalendarError> {
        select_from(self.events.iter().cloned().map(Ok).collect(), start)
    }
}

/// Calendar backed by a calendar-list export on disk. The file is re-read on
/// every fetch.
#[derive(Debug, Clone)]
pub struct JsonCalendar {
    path: PathBuf,
    calendar_name: String,
}

#[derive(Debug, Deserialize)]
struct CalendarExport {
    #[serde(default)]
    items: Vec<CalendarEntry>,
}

#[derive(Debug, Deserialize)]
struct CalendarEntry {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    events: Vec<Value>,
}

impl JsonCalendar {
    pub fn new(path: impl AsRef<Path>, calendar_name: &str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            calendar_name: calendar_name.to_string(),
        }
    }
}

impl Fetcher for JsonCalendar {
    fn fetch(&self, start: DateTime<Utc>) -> Result<EventIter, CalendarError> {
        let raw = fs::read_to_string(&self.path)?;
        let export: CalendarExport = serde_json::from_str(&raw)?;
        let Some(entry) = export
            .items
            .into_iter()
            .find(|entry| entry.summary == self.calendar_name)
        else {
            return Err(CalendarError::CalendarNotFound(self.calendar_name.clone()));
        };
        tracing::debug!(
            calendar = %self.calendar_name,
            path = %self.path.display(),
            events = entry.events.len(),
            "loaded calendar export"
        );
        let items = entry
            .events
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<RawEvent>(value)
                    .map_err(|err| CalendarError::Item(format!("event {index}: {err}")))
            })
            .collect();
        select_from(items, start)
    }
}

/// Keeps events at or after `start` ordered by start date. Items whose date
/// cannot be resolved, and items that failed to decode, are kept after the
/// dated events so the consumer can report them.
fn select_from(items: Vec<EventItem>, start: DateTime<Utc>) -> Result<EventIter, CalendarError> {
    let mut dated = Vec::new();
    let mut undated = Vec::new();
    for item in items {
        match item {
            Ok(event) => match resolve_date(&event) {
                Some(date) if date >= start => dated.push((date, event)),
                Some(_) => {}
                None => undated.push(Ok(event)),
            },
            Err(err) => undated.push(Err(err)),
        }
    }
    if dated.is_empty() && undated.is_empty() {
        return Err(CalendarError::NoEventsFound);
    }
    dated.sort_by_key(|(date, _)| *date);
    let mut ordered: Vec<EventItem> = dated.into_iter().map(|(_, event)| Ok(event)).collect();
    ordered.extend(undated);
    Ok(EventIter::new(ordered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn static_calendar_filters_and_orders() {
        let calendar = StaticCalendar::new(vec![
            RawEvent::on_date("3 units", "2024-06-03"),
            RawEvent::on_date("1 unit", "2024-05-30"),
            RawEvent::at("2 units", "2024-06-02T08:00:00Z"),
        ]);
        let iter = calendar.fetch(utc(2024, 6, 1)).expect("events");
        assert_eq!(iter.total(), 2);
        let summaries: Vec<String> = iter
            .map(|item| item.expect("event").summary)
            .collect();
        assert_eq!(summaries, vec!["2 units", "3 units"]);
    }

    #[test]
    fn static_calendar_reports_no_events() {
        let calendar = StaticCalendar::new(vec![RawEvent::on_date("1", "2020-01-01")]);
        let err = calendar.fetch(utc(2024, 1, 1)).expect_err("no events");
        assert!(matches!(err, CalendarError::NoEventsFound));
    }

    #[test]
    fn json_calendar_selects_by_name() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("calendars.json");
        let export = r#"{
          "items": [
            {"summary": "Work", "events": [{"summary": "9 units", "start": {"date": "2024-01-01"}}]},
            {"summary": "Units Consumed", "events": [
              {"id": "b", "summary": "2 units", "start": {"dateTime": "2024-01-02T20:00:00Z"}},
              {"id": "a", "summary": "? units", "start": {"date": "2024-01-01"}},
              {"id": "bad", "summary": 7}
            ]}
          ]
        }"#;
        fs::write(&path, export).expect("write export");

        let calendar = JsonCalendar::new(&path, "Units Consumed");
        let items: Vec<EventItem> = calendar.fetch(utc(2000, 1, 1)).expect("events").collect();
        assert_eq!(items.len(), 3);
        let ids: Vec<Option<String>> = items
            .iter()
            .filter_map(|item| item.as_ref().ok())
            .map(|event| event.id.clone())
            .collect();
        assert_eq!(ids, vec![Some("a".to_string()), Some("b".to_string())]);
        assert!(matches!(items[2], Err(CalendarError::Item(_))));
    }

    #[test]
    fn json_calendar_missing_calendar() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("calendars.json");
        fs::write(&path, r#"{"items": []}"#).expect("write export");
        let err = JsonCalendar::new(&path, "Units Consumed")
            .fetch(utc(2000, 1, 1))
            .expect_err("missing calendar");
        assert!(matches!(err, CalendarError::CalendarNotFound(name) if name == "Units Consumed"));
    }
}
