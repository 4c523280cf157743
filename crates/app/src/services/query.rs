use chrono::Utc;
use units_core::{Granularity, Plot, QuerySet};
use units_db::Db;

use crate::config::QueryParams;
use crate::error::Result;
use crate::services::{SharedConfig, open_db};
use crate::translate::query_plots;
use crate::util::time::resolve_query;

#[derive(Clone)]
pub struct QueryService {
    config: SharedConfig,
}

impl QueryService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn resolve(&self, params: &QueryParams) -> Result<QuerySet> {
        resolve_query(params, Utc::now())
    }

    pub fn plots(&self, query: &QuerySet) -> Result<Vec<Plot>> {
        let db = self.db()?;
        Ok(query_plots(&db, query)?)
    }

    pub fn guideline(&self, granularity: Granularity) -> Option<f64> {
        guideline_for(granularity, self.config.weekly_guideline)
    }
}

/// Recommended total for one bucket, scaled from the weekly figure. Days
/// carry no guideline.
pub fn guideline_for(granularity: Granularity, weekly: f64) -> Option<f64> {
    match granularity {
        Granularity::Day => None,
        Granularity::Week => Some(weekly),
        Granularity::Month => Some(weekly * 4.0),
        Granularity::Year => Some(weekly * 48.0),
    }
}
