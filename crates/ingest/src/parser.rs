use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use units_core::{ParsedEvent, Quantity, RawEvent};

use crate::types::ParseError;

// First run of digits and `?`, with an optional fractional part.
static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9?]+(?:\.[0-9]*)?|\.[0-9]+").expect("valid quantity regex")
});

/// Parses one calendar event into a dated quantity.
pub fn parse_event(event: &RawEvent) -> Result<ParsedEvent, ParseError> {
    let date = resolve_date(event).ok_or_else(|| ParseError::MissingDate {
        summary: event.summary.clone(),
    })?;
    let quantity = extract_quantity(&event.summary)?;
    Ok(ParsedEvent { date, quantity })
}

pub fn extract_quantity(summary: &str) -> Result<Quantity, ParseError> {
    let Some(found) = QUANTITY_RE.find(summary) else {
        return Err(ParseError::NoQuantity {
            summary: summary.to_string(),
        });
    };
    let matched = found.as_str();
    if matched == "?" {
        return Ok(Quantity::Unknown);
    }
    matched
        .parse::<f64>()
        .map(Quantity::Known)
        .map_err(|_| ParseError::MalformedQuantity {
            summary: summary.to_string(),
            matched: matched.to_string(),
        })
}

/// Prefers the precise start instant and falls back to the all-day date at
/// midnight UTC.
pub fn resolve_date(event: &RawEvent) -> Option<DateTime<Utc>> {
    if let Some(raw) = event.start.date_time.as_deref()
        && let Ok(parsed) = DateTime::parse_from_rfc3339(raw.trim())
    {
        return Some(parsed.with_timezone(&Utc));
    }
    let raw = event.start.date.as_deref()?;
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()?;
    Some(date.and_time(NaiveTime::MIN).and_utc())
}
