mod calendar;
mod parser;
mod pipeline;
mod plots;
mod totals;
mod types;

pub use calendar::{EventIter, Fetcher, JsonCalendar, StaticCalendar};
pub use parser::{extract_quantity, parse_event, resolve_date};
pub use pipeline::{SUMMARY_TAG, collect_events, resolve_collect_start};
pub use plots::{fill_gaps, plots_from_events};
pub use totals::{SeriesTotals, reduce};
pub use types::{
    CalendarError, CollectIssue, CollectOutcome, CollectStats, IngestError, ParseError, Result,
};
