use chrono::{DateTime, Utc};
use serde::Deserialize;
use units_app::{AppError, Result};

#[derive(Debug, Deserialize, Default)]
pub struct QueryRequest {
    pub aggregation: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlotsRequest {
    pub aggregation: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct CollectRequest {
    #[serde(default)]
    pub start_time_override: Option<DateTime<Utc>>,
}

impl CollectRequest {
    /// Decodes an optional JSON body. An empty body means no override.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|err| AppError::InvalidInput(format!("invalid collect body: {}", err)))
    }
}
