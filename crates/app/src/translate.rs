use units_core::{Plot, QuerySet, UNITS_FIELD, Window, WindowRequest};
use units_db::{DbError, Storer};

/// Runs a validated query as a windowed sum against the store and relabels
/// each window with its opening instant.
///
/// An unset start is taken from the oldest stored record. The store labels
/// windows by their closing instant, so every row is moved back by one
/// window width. Empty windows come back as zero.
pub fn query_plots<S: Storer + ?Sized>(
    store: &S,
    query: &QuerySet,
) -> units_db::Result<Vec<Plot>> {
    let start = match query.start_time {
        Some(start) => start,
        None => store.read_first_timestamp()?,
    };
    let granularity = query.aggregation;
    let request = WindowRequest {
        start,
        stop: query.end_time,
        window: Window::for_granularity(granularity),
        field: UNITS_FIELD,
        create_empty: true,
    };
    let rows = store.query(&request)?;
    if rows.is_empty() {
        return Err(DbError::NoResults);
    }
    Ok(rows
        .into_iter()
        .map(|row| Plot::new(granularity.retreat(row.time, 1), row.value.unwrap_or(0.0)))
        .collect())
}
