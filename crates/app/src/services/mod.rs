mod collect;
mod plots;
mod query;

use std::sync::Arc;

use ingest::Fetcher;
use units_db::Db;

use crate::app::TrackerConfig;
use crate::error::Result;

pub use collect::CollectService;
pub use plots::PlotsService;
pub use query::{QueryService, guideline_for};

type SharedConfig = Arc<TrackerConfig>;
type SharedFetcher = Arc<dyn Fetcher>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub query: QueryService,
    pub collect: CollectService,
    pub plots: PlotsService,
}

impl AppServices {
    pub fn new(config: &TrackerConfig, fetcher: SharedFetcher) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            query: QueryService::new(shared.clone()),
            collect: CollectService::new(shared.clone(), fetcher.clone()),
            plots: PlotsService::new(shared, fetcher),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}
