mod buckets;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use buckets::{Window, whole_months_between};

/// Storage measurement every collected record is written under.
pub const MEASUREMENT: &str = "units_consumed";
/// Field name carrying the resolved quantity of a collected record.
pub const UNITS_FIELD: &str = "units";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("unsupported aggregation: {0:?}")]
    UnsupportedAggregation(String),
    #[error("end time must not be zero")]
    ZeroEndTime,
    #[error("start time must not exceed end time")]
    StartAfterEnd,
}

/// Bucket width used when aggregating a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(QueryError::UnsupportedAggregation(other.to_string())),
        }
    }
}

/// Amount extracted from an event label. `Unknown` is kept distinct so the
/// default applied to it can vary per caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    Known(f64),
    Unknown,
}

impl Quantity {
    pub fn resolve(self, unknown_default: f64) -> f64 {
        match self {
            Self::Known(value) => value,
            Self::Unknown => unknown_default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedEvent {
    pub date: DateTime<Utc>,
    pub quantity: Quantity,
}

/// Start of a calendar entry: a precise timestamp, an all-day date, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Calendar entry as delivered by a calendar source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub start: EventStart,
}

impl RawEvent {
    pub fn on_date(summary: &str, date: &str) -> Self {
        Self {
            id: None,
            summary: summary.to_string(),
            start: EventStart {
                date_time: None,
                date: Some(date.to_string()),
            },
        }
    }

    pub fn at(summary: &str, date_time: &str) -> Self {
        Self {
            id: None,
            summary: summary.to_string(),
            start: EventStart {
                date_time: Some(date_time.to_string()),
                date: None,
            },
        }
    }
}

/// A point on a graph: bucket start in epoch milliseconds and its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    #[serde(rename = "t")]
    pub timestamp: i64,
    #[serde(rename = "y")]
    pub value: f64,
}

impl Plot {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            timestamp: timestamp.timestamp_millis(),
            value,
        }
    }
}

/// Validated aggregation request. An unset `start_time` means "from the
/// earliest stored record".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySet {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: DateTime<Utc>,
    pub aggregation: Granularity,
}

impl QuerySet {
    pub fn new(
        aggregation: &str,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<Self, QueryError> {
        let aggregation = aggregation.parse::<Granularity>()?;
        let end_time = end_time.ok_or(QueryError::ZeroEndTime)?;
        if let Some(start) = start_time
            && start > end_time
        {
            return Err(QueryError::StartAfterEnd);
        }
        Ok(Self {
            start_time,
            end_time,
            aggregation,
        })
    }
}

/// Storage record: one instant with string tags and numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub time: DateTime<Utc>,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, f64>,
}

impl Record {
    pub fn units(time: DateTime<Utc>, units: f64) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(UNITS_FIELD.to_string(), units);
        Self {
            time,
            tags: BTreeMap::new(),
            fields,
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }
}

/// Windowed sum over `[start, stop)` for a single stored field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRequest<'a> {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub window: Window,
    pub field: &'a str,
    pub create_empty: bool,
}

/// Row returned by the aggregation engine, labelled with the window's
/// closing instant. `value` is `None` for a materialised empty window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRow {
    pub time: DateTime<Utc>,
    pub value: Option<f64>,
}
