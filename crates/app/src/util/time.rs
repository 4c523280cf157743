use chrono::{DateTime, Utc};
use units_core::QuerySet;

use crate::config::QueryParams;
use crate::error::{AppError, Result};

/// Builds a validated [`QuerySet`] from raw parameters.
///
/// Time values that are missing, blank or not RFC 3339 count as unset. An
/// unset end defaults to `now`; an unset start stays unset.
pub fn resolve_query(params: &QueryParams, now: DateTime<Utc>) -> Result<QuerySet> {
    let aggregation = params
        .aggregation
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::InvalidInput("missing aggregation".to_string()))?;
    let start = params.start_time.as_deref().and_then(parse_optional_time);
    let end = params
        .end_time
        .as_deref()
        .and_then(parse_optional_time)
        .unwrap_or(now);
    Ok(QuerySet::new(aggregation, start, Some(end))?)
}

pub fn parse_optional_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(err) => {
            tracing::debug!(value, error = %err, "ignoring unparseable time parameter");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use units_core::{Granularity, QueryError};

    fn params(aggregation: Option<&str>, start: Option<&str>, end: Option<&str>) -> QueryParams {
        QueryParams {
            aggregation: aggregation.map(str::to_string),
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn resolves_explicit_bounds() {
        let query = resolve_query(
            &params(
                Some("week"),
                Some("2024-01-01T00:00:00Z"),
                Some("2024-02-01T01:00:00+01:00"),
            ),
            now(),
        )
        .expect("query");
        assert_eq!(query.aggregation, Granularity::Week);
        assert_eq!(
            query.start_time,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            query.end_time,
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn unparseable_times_are_unset() {
        let query = resolve_query(
            &params(Some("day"), Some("yesterday"), Some("")),
            now(),
        )
        .expect("query");
        assert_eq!(query.start_time, None);
        assert_eq!(query.end_time, now());
    }

    #[test]
    fn rejects_unknown_aggregation() {
        let err = resolve_query(&params(Some("fortnight"), None, None), now())
            .expect_err("invalid aggregation");
        assert!(matches!(
            err,
            AppError::Query(QueryError::UnsupportedAggregation(_))
        ));
    }

    #[test]
    fn rejects_missing_aggregation() {
        let err = resolve_query(&params(None, None, None), now()).expect_err("missing");
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn rejects_start_after_end() {
        let err = resolve_query(
            &params(
                Some("month"),
                Some("2024-06-02T00:00:00Z"),
                Some("2024-06-01T00:00:00Z"),
            ),
            now(),
        )
        .expect_err("start after end");
        assert!(matches!(err, AppError::Query(QueryError::StartAfterEnd)));
    }
}
