use units_core::{Granularity, ParsedEvent, Plot};

use crate::totals::{SeriesTotals, reduce};

/// Expands sparse totals into one point per bucket from the first to the last
/// bucket inclusive, with zero for buckets nothing contributed to.
pub fn fill_gaps(totals: &SeriesTotals) -> Vec<Plot> {
    let Some((first, last)) = totals.span else {
        return Vec::new();
    };
    let granularity = totals.granularity;
    let count = granularity.bucket_count(first, last);
    let mut plots = Vec::with_capacity(count);
    for index in 0..count {
        let bucket = granularity.advance(first, index as u32);
        plots.push(Plot::new(bucket, totals.get(bucket).unwrap_or(0.0)));
    }
    plots
}

/// Reduces date-ordered events and gap-fills the result.
pub fn plots_from_events(
    events: &[ParsedEvent],
    granularity: Granularity,
    unknown_default: f64,
) -> Vec<Plot> {
    fill_gaps(&reduce(events, granularity, unknown_default))
}
