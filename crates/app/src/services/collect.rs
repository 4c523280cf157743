use chrono::{DateTime, Utc};
use ingest::CollectOutcome;
use units_db::Db;

use crate::error::Result;
use crate::services::{SharedConfig, SharedFetcher, open_db};

#[derive(Clone)]
pub struct CollectService {
    config: SharedConfig,
    fetcher: SharedFetcher,
}

impl CollectService {
    pub(super) fn new(config: SharedConfig, fetcher: SharedFetcher) -> Self {
        Self { config, fetcher }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn run(&self, start_override: Option<DateTime<Utc>>) -> Result<CollectOutcome> {
        let mut db = self.db()?;
        Ok(ingest::collect_events(
            &mut db,
            self.fetcher.as_ref(),
            start_override,
            self.config.unknown_default,
        )?)
    }
}
