use serde::Serialize;
use units_core::Plot;

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub plots: Vec<Plot>,
    pub metadata: PlotMetadata,
}

#[derive(Debug, Default, Serialize)]
pub struct PlotMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guideline: Option<f64>,
}
