use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use units_core::{Granularity, ParsedEvent};

/// Sparse per-bucket sums produced by [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTotals {
    pub granularity: Granularity,
    /// Bucket start in epoch milliseconds to summed quantity.
    pub buckets: BTreeMap<i64, f64>,
    /// Truncated buckets of the first and last events. `None` when there
    /// were no events.
    pub span: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl SeriesTotals {
    pub fn is_empty(&self) -> bool {
        self.span.is_none()
    }

    pub fn get(&self, bucket: DateTime<Utc>) -> Option<f64> {
        self.buckets.get(&bucket.timestamp_millis()).copied()
    }
}

/// Folds date-ordered events into per-bucket sums.
///
/// The input is expected in ascending date order; the span is read from the
/// first and last elements without sorting.
pub fn reduce(
    events: &[ParsedEvent],
    granularity: Granularity,
    unknown_default: f64,
) -> SeriesTotals {
    let mut buckets = BTreeMap::new();
    for event in events {
        let bucket = granularity.truncate(event.date);
        *buckets.entry(bucket.timestamp_millis()).or_insert(0.0) +=
            event.quantity.resolve(unknown_default);
    }
    let span = match (events.first(), events.last()) {
        (Some(first), Some(last)) => Some((
            granularity.truncate(first.date),
            granularity.truncate(last.date),
        )),
        _ => None,
    };
    SeriesTotals {
        granularity,
        buckets,
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use units_core::Quantity;

    fn event(y: i32, m: u32, d: u32, h: u32, quantity: Quantity) -> ParsedEvent {
        ParsedEvent {
            date: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            quantity,
        }
    }

    #[test]
    fn empty_input_has_no_span() {
        let totals = reduce(&[], Granularity::Day, 14.0);
        assert!(totals.is_empty());
        assert!(totals.buckets.is_empty());
    }

    #[test]
    fn single_event_spans_one_bucket() {
        let events = [event(2024, 1, 3, 18, Quantity::Known(2.5))];
        let totals = reduce(&events, Granularity::Day, 14.0);
        let day = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        assert_eq!(totals.span, Some((day, day)));
        assert_eq!(totals.get(day), Some(2.5));
    }

    #[test]
    fn sums_within_bucket_and_applies_default() {
        let events = [
            event(2024, 1, 3, 9, Quantity::Known(2.0)),
            event(2024, 1, 3, 22, Quantity::Unknown),
            event(2024, 1, 4, 1, Quantity::Known(1.0)),
        ];
        let totals = reduce(&events, Granularity::Day, 14.0);
        let third = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let fourth = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
        assert_eq!(totals.get(third), Some(16.0));
        assert_eq!(totals.get(fourth), Some(1.0));
        assert_eq!(totals.span, Some((third, fourth)));
    }

    #[test]
    fn month_buckets_group_calendar_months() {
        let events = [
            event(2024, 1, 31, 23, Quantity::Known(1.0)),
            event(2024, 2, 1, 0, Quantity::Known(2.0)),
            event(2024, 2, 29, 12, Quantity::Known(3.0)),
        ];
        let totals = reduce(&events, Granularity::Month, 0.0);
        assert_eq!(totals.buckets.len(), 2);
        let feb = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(totals.get(feb), Some(5.0));
    }
}
