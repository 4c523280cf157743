use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use ingest::{CalendarError, CollectOutcome, EventIter, Fetcher, StaticCalendar};
use tempfile::tempdir;
use units_app::{AppError, AppState, QueryParams, TrackerConfig};
use units_core::{Granularity, Plot, RawEvent};
use units_db::DbError;

fn app_with_events(dir: &std::path::Path, events: Vec<RawEvent>) -> AppState {
    let config = TrackerConfig::new(dir.join("app.sqlite"));
    let app_state = AppState::new(config, Arc::new(StaticCalendar::new(events)));
    app_state.setup_db().expect("setup db");
    app_state
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

/// Calendar whose middle event could not be decoded.
struct PartlyUndecodableCalendar;

impl Fetcher for PartlyUndecodableCalendar {
    fn fetch(&self, _start: DateTime<Utc>) -> Result<EventIter, CalendarError> {
        Ok(EventIter::new(vec![
            Ok(RawEvent::on_date("2 units", "2024-01-01")),
            Err(CalendarError::Item("event 1: bad summary".to_string())),
            Ok(RawEvent::on_date("3 units", "2024-01-03")),
        ]))
    }
}

#[test]
fn collect_then_query_smoke() {
    let dir = tempdir().expect("temp dir");
    let app_state = app_with_events(
        dir.path(),
        vec![
            RawEvent::on_date("2 units", "2024-01-01"),
            RawEvent::at("3 units", "2024-01-03T19:00:00Z"),
            RawEvent::on_date("? units", "2024-01-04"),
            RawEvent::on_date("forgot", "2024-01-04"),
        ],
    );

    let outcome = app_state.services.collect.run(None).expect("collect");
    let CollectOutcome::Collected(stats) = outcome else {
        panic!("expected collected outcome");
    };
    assert_eq!(stats.records_stored, 3);
    assert_eq!(stats.events_skipped, 1);

    let query = app_state
        .services
        .query
        .resolve(&QueryParams {
            aggregation: Some("day".to_string()),
            start_time: None,
            end_time: Some("2024-01-05T00:00:00Z".to_string()),
        })
        .expect("query");
    let plots = app_state.services.query.plots(&query).expect("plots");
    assert_eq!(
        plots,
        vec![
            Plot::new(day(1), 2.0),
            Plot::new(day(2), 0.0),
            Plot::new(day(3), 3.0),
            Plot::new(day(4), 14.0),
        ]
    );

    let again = app_state.services.collect.run(None).expect("collect again");
    assert!(matches!(again, CollectOutcome::NothingNew { .. }));
}

#[test]
fn query_on_empty_store_is_no_results() {
    let dir = tempdir().expect("temp dir");
    let app_state = app_with_events(dir.path(), Vec::new());
    let query = app_state
        .services
        .query
        .resolve(&QueryParams {
            aggregation: Some("week".to_string()),
            ..QueryParams::default()
        })
        .expect("query");
    let err = app_state.services.query.plots(&query).expect_err("no results");
    assert!(matches!(err, AppError::Db(DbError::NoResults)));
    assert!(err.is_no_data());
}

#[test]
fn calendar_plots_gap_fill() {
    let dir = tempdir().expect("temp dir");
    let app_state = app_with_events(
        dir.path(),
        vec![
            RawEvent::on_date("5 units", "2024-01-08"),
            RawEvent::on_date("2 units", "2024-01-01"),
            RawEvent::on_date("3 units", "2024-01-03"),
        ],
    );
    let plots = app_state
        .services
        .plots
        .run(Granularity::Day)
        .expect("plots");
    let values: Vec<f64> = plots.iter().map(|plot| plot.value).collect();
    assert_eq!(values, vec![2.0, 0.0, 3.0, 0.0, 0.0, 0.0, 0.0, 5.0]);
    assert_eq!(app_state.services.query.guideline(Granularity::Month), Some(56.0));
}

#[test]
fn calendar_plots_without_events_is_no_data() {
    let dir = tempdir().expect("temp dir");
    let app_state = app_with_events(dir.path(), Vec::new());
    let err = app_state
        .services
        .plots
        .run(Granularity::Week)
        .expect_err("no events");
    assert!(err.is_no_data());
}

#[test]
fn calendar_plots_with_only_unparseable_events_is_no_data() {
    let dir = tempdir().expect("temp dir");
    let app_state = app_with_events(
        dir.path(),
        vec![
            RawEvent::on_date("forgot", "2024-01-04"),
            RawEvent::on_date("no idea", "2024-01-05"),
        ],
    );
    let err = app_state
        .services
        .plots
        .run(Granularity::Day)
        .expect_err("nothing parsed");
    assert!(matches!(err, AppError::Calendar(CalendarError::NoEventsFound)));
    assert!(err.is_no_data());
}

#[test]
fn calendar_plots_skip_undecodable_events() {
    let dir = tempdir().expect("temp dir");
    let app_state = AppState::new(
        TrackerConfig::new(dir.path().join("app.sqlite")),
        Arc::new(PartlyUndecodableCalendar),
    );
    let plots = app_state
        .services
        .plots
        .run(Granularity::Day)
        .expect("plots");
    assert_eq!(
        plots,
        vec![
            Plot::new(day(1), 2.0),
            Plot::new(day(2), 0.0),
            Plot::new(day(3), 3.0),
        ]
    );
}
