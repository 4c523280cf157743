use ingest::CollectOutcome;
use units_app::{AppError, QueryParams, Result};
use units_core::{Granularity, Plot};

use crate::{AppContext, CollectRequest, PlotMetadata, PlotsRequest, QueryRequest, QueryResponse};

fn parse_aggregation(aggregation: Option<String>) -> Result<Granularity> {
    let value = aggregation
        .ok_or_else(|| AppError::InvalidInput("missing aggregation".to_string()))?;
    Ok(value.trim().parse::<Granularity>()?)
}

fn plot_response(ctx: &AppContext, granularity: Granularity, plots: Vec<Plot>) -> QueryResponse {
    QueryResponse {
        plots,
        metadata: PlotMetadata {
            guideline: ctx.app_state.services.query.guideline(granularity),
        },
    }
}

/// Windowed totals from the store.
pub fn query(ctx: &AppContext, req: QueryRequest) -> Result<QueryResponse> {
    let services = &ctx.app_state.services;
    let query = services.query.resolve(&QueryParams {
        aggregation: req.aggregation,
        start_time: req.start_time,
        end_time: req.end_time,
    })?;
    let plots = services.query.plots(&query)?;
    Ok(plot_response(ctx, query.aggregation, plots))
}

/// Gap-filled totals computed straight from the calendar.
pub fn plots(ctx: &AppContext, req: PlotsRequest) -> Result<QueryResponse> {
    let granularity = parse_aggregation(req.aggregation)?;
    let plots = ctx.app_state.services.plots.run(granularity)?;
    Ok(plot_response(ctx, granularity, plots))
}

pub fn collect(ctx: &AppContext, req: CollectRequest) -> Result<CollectOutcome> {
    ctx.app_state
        .services
        .collect
        .run(req.start_time_override)
}
