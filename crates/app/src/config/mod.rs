use serde::{Deserialize, Serialize};

/// Raw query-string values for a windowed query. Every field may be absent.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct QueryParams {
    pub aggregation: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}
