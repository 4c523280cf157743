use std::path::{Path, PathBuf};
use std::sync::Arc;

use ingest::{Fetcher, JsonCalendar, StaticCalendar};
use serde::{Deserialize, Serialize};
use units_db::Db;

use crate::error::{AppError, Result};
use crate::services::AppServices;

pub const DEFAULT_CALENDAR_NAME: &str = "Units Consumed";
pub const DEFAULT_UNKNOWN_UNITS: f64 = 14.0;
pub const DEFAULT_WEEKLY_GUIDELINE: f64 = 14.0;

/// Runtime settings for the tracker, fixed at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub db_path: PathBuf,
    /// Name of the calendar holding consumption events.
    pub calendar_name: String,
    /// Units recorded for an event whose label only says `?`.
    pub unknown_default: f64,
    /// Recommended units per week; scaled for longer aggregations.
    pub weekly_guideline: f64,
    /// Calendar-list export read by the JSON calendar source.
    pub events_file: Option<PathBuf>,
}

impl TrackerConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            calendar_name: DEFAULT_CALENDAR_NAME.to_string(),
            unknown_default: DEFAULT_UNKNOWN_UNITS,
            weekly_guideline: DEFAULT_WEEKLY_GUIDELINE,
            events_file: None,
        }
    }
}

/// Application state shared by frontend backends.
#[derive(Clone)]
pub struct AppState {
    pub config: TrackerConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: TrackerConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let services = AppServices::new(&config, fetcher);
        Self { config, services }
    }

    /// Builds state with the calendar source the config points at.
    pub fn from_config(config: TrackerConfig) -> Self {
        let fetcher = default_fetcher(&config);
        Self::new(config, fetcher)
    }

    pub fn is_fresh_db(&self) -> bool {
        !self.config.db_path.exists()
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    pub fn initialize(&self) -> Result<()> {
        let is_fresh_db = self.is_fresh_db();
        self.setup_db()
            .map_err(|err| AppError::Message(format!("initialize db: {}", err)))?;
        tracing::info!(
            db = %self.config.db_path.display(),
            fresh = is_fresh_db,
            "database ready"
        );
        Ok(())
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }
}

/// JSON export when one is configured, otherwise an empty in-memory calendar.
pub fn default_fetcher(config: &TrackerConfig) -> Arc<dyn Fetcher> {
    match &config.events_file {
        Some(path) => Arc::new(JsonCalendar::new(path, &config.calendar_name)),
        None => {
            tracing::warn!("no events file configured; collection will find no events");
            Arc::new(StaticCalendar::default())
        }
    }
}

pub fn setup_db(path: &Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
