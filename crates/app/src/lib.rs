pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod startup;
pub mod translate;
pub mod util;

pub use app::{AppState, TrackerConfig, default_fetcher};
pub use config::QueryParams;
pub use error::{ApiError, AppError, Result};
pub use services::{AppServices, guideline_for};
pub use startup::{AppPaths, ensure_app_data_dir};
pub use translate::query_plots;
pub use util::time::{parse_optional_time, resolve_query};
