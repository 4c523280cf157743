use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveTime, Utc};

use crate::Granularity;

const DAYS_PER_WEEK: i64 = 7;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

impl Granularity {
    /// Aligns `ts` to the start of its bucket. Weeks are fixed 7-day cycles
    /// anchored at the Unix epoch, not calendar weeks.
    pub fn truncate(self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let date = ts.date_naive();
        let day = match self {
            Self::Day | Self::Week => date,
            Self::Month => date - Days::new(u64::from(date.day0())),
            Self::Year => date - Days::new(u64::from(date.ordinal0())),
        };
        let start = day.and_time(NaiveTime::MIN).and_utc();
        if self == Self::Week {
            let into_cycle = start
                .timestamp()
                .div_euclid(SECONDS_PER_DAY)
                .rem_euclid(DAYS_PER_WEEK);
            return start - Duration::days(into_cycle);
        }
        start
    }

    /// Calendar-advances `ts` by `n` buckets. Month and year steps land on the
    /// same day-of-month regardless of month length.
    pub fn advance(self, ts: DateTime<Utc>, n: u32) -> DateTime<Utc> {
        match self {
            Self::Day => ts + Duration::days(i64::from(n)),
            Self::Week => ts + Duration::days(DAYS_PER_WEEK * i64::from(n)),
            Self::Month => ts + Months::new(n),
            Self::Year => ts + Months::new(n.saturating_mul(12)),
        }
    }

    /// Inverse of [`Granularity::advance`].
    pub fn retreat(self, ts: DateTime<Utc>, n: u32) -> DateTime<Utc> {
        match self {
            Self::Day => ts - Duration::days(i64::from(n)),
            Self::Week => ts - Duration::days(DAYS_PER_WEEK * i64::from(n)),
            Self::Month => ts - Months::new(n),
            Self::Year => ts - Months::new(n.saturating_mul(12)),
        }
    }

    /// Number of buckets from `first` to `last` inclusive. Zero when `last`
    /// precedes `first`.
    pub fn bucket_count(self, first: DateTime<Utc>, last: DateTime<Utc>) -> usize {
        if last < first {
            return 0;
        }
        let elapsed = last - first;
        let steps = match self {
            Self::Day => elapsed.num_hours() / 24,
            Self::Week => elapsed.num_hours() / (24 * DAYS_PER_WEEK),
            Self::Month => whole_months_between(first, last),
            Self::Year => whole_months_between(first, last) / 12,
        };
        usize::try_from(steps).map_or(0, |steps| steps + 1)
    }
}

/// Complete calendar months between two instants, order-insensitive. A month
/// only counts once the later instant reaches the same day and time of day.
pub fn whole_months_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let (from, to) = if a > b { (b, a) } else { (a, b) };
    let mut months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());
    if (to.day(), to.time()) < (from.day(), from.time()) {
        months -= 1;
    }
    months
}

/// Aggregation window used by the store: one bucket width shifted by a fixed
/// offset from the bucket alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub every: Granularity,
    pub offset: Duration,
}

impl Window {
    pub fn for_granularity(granularity: Granularity) -> Self {
        let offset = match granularity {
            Granularity::Week => Duration::days(-3),
            Granularity::Day | Granularity::Month | Granularity::Year => Duration::zero(),
        };
        Self {
            every: granularity,
            offset,
        }
    }

    pub fn start_of(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        self.every.truncate(ts - self.offset) + self.offset
    }

    pub fn stop_of(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        self.every.advance(self.start_of(ts), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .single()
            .expect("valid date")
    }

    const ALL: [Granularity; 4] = [
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
    ];

    #[test]
    fn truncation_is_idempotent() {
        let samples = [
            at(2024, 1, 1, 0),
            at(2024, 2, 29, 23),
            at(2023, 12, 31, 12),
            at(1970, 1, 1, 5),
            at(1969, 12, 30, 7),
        ];
        for granularity in ALL {
            for sample in samples {
                let once = granularity.truncate(sample);
                assert_eq!(granularity.truncate(once), once, "{granularity} {sample}");
                assert!(once <= sample);
            }
        }
    }

    #[test]
    fn truncates_to_expected_boundaries() {
        let ts = at(2024, 5, 17, 15);
        assert_eq!(Granularity::Day.truncate(ts), at(2024, 5, 17, 0));
        assert_eq!(Granularity::Month.truncate(ts), at(2024, 5, 1, 0));
        assert_eq!(Granularity::Year.truncate(ts), at(2024, 1, 1, 0));
        // epoch-anchored cycles start on Thursdays
        assert_eq!(Granularity::Week.truncate(ts), at(2024, 5, 16, 0));
        assert_eq!(Granularity::Week.truncate(at(1970, 1, 3, 0)), at(1970, 1, 1, 0));
        assert_eq!(
            Granularity::Week.truncate(at(1969, 12, 31, 0)),
            at(1969, 12, 25, 0)
        );
    }

    #[test]
    fn month_advance_follows_calendar() {
        let jan = at(2024, 1, 1, 0);
        assert_eq!(Granularity::Month.advance(jan, 1), at(2024, 2, 1, 0));
        assert_eq!(Granularity::Month.advance(jan, 2), at(2024, 3, 1, 0));
        assert_eq!(Granularity::Month.advance(jan, 13), at(2025, 2, 1, 0));
        assert_eq!(Granularity::Year.advance(jan, 2), at(2026, 1, 1, 0));
        assert_eq!(Granularity::Month.retreat(at(2024, 3, 1, 0), 1), jan + Months::new(1));
    }

    #[test]
    fn bucket_count_is_inclusive() {
        let first = at(2024, 1, 1, 0);
        assert_eq!(Granularity::Day.bucket_count(first, first), 1);
        assert_eq!(Granularity::Day.bucket_count(first, at(2024, 1, 8, 0)), 8);
        assert_eq!(Granularity::Week.bucket_count(first, at(2024, 1, 22, 0)), 4);
        assert_eq!(Granularity::Month.bucket_count(first, at(2024, 12, 1, 0)), 12);
        assert_eq!(Granularity::Month.bucket_count(at(2024, 1, 1, 0), at(2024, 3, 1, 0)), 3);
        assert_eq!(Granularity::Year.bucket_count(first, at(2026, 1, 1, 0)), 3);
        assert_eq!(Granularity::Day.bucket_count(at(2024, 1, 2, 0), first), 0);
    }

    #[test]
    fn whole_months_uses_calendar_delta() {
        assert_eq!(whole_months_between(at(2024, 1, 31, 0), at(2024, 2, 29, 0)), 0);
        assert_eq!(whole_months_between(at(2024, 1, 31, 0), at(2024, 3, 31, 0)), 2);
        assert_eq!(whole_months_between(at(2023, 11, 1, 0), at(2024, 2, 1, 0)), 3);
        assert_eq!(whole_months_between(at(2024, 2, 1, 0), at(2023, 11, 1, 0)), 3);
    }

    #[test]
    fn week_window_is_offset_to_monday() {
        let window = Window::for_granularity(Granularity::Week);
        // 2024-05-17 is a Friday; its window opens on Monday 2024-05-13
        let start = window.start_of(at(2024, 5, 17, 9));
        assert_eq!(start, at(2024, 5, 13, 0));
        assert_eq!(window.stop_of(at(2024, 5, 17, 9)), at(2024, 5, 20, 0));
        assert_eq!(window.start_of(start), start);
    }

    #[test]
    fn month_window_matches_truncation() {
        let window = Window::for_granularity(Granularity::Month);
        assert_eq!(window.start_of(at(2024, 2, 29, 10)), at(2024, 2, 1, 0));
        assert_eq!(window.stop_of(at(2024, 2, 29, 10)), at(2024, 3, 1, 0));
    }
}
