use axum::{
    body::Bytes,
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use app_api::{CollectRequest, PlotsRequest, QueryRequest};
use ingest::CollectOutcome;

use crate::{errors::HttpError, state::HttpState};

pub async fn query(
    State(state): State<HttpState>,
    Query(req): Query<QueryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::query(&state.context, req)?;
    Ok(Json(response))
}

pub async fn plots(
    State(state): State<HttpState>,
    Query(req): Query<PlotsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = tokio::task::spawn_blocking(move || app_api::plots(&context, req))
        .await
        .map_err(join_error)??;
    Ok(Json(response))
}

/// The body is optional, so it is decoded by hand rather than through `Json`.
pub async fn collect(State(state): State<HttpState>, body: Bytes) -> Result<Response, HttpError> {
    let req = CollectRequest::from_body(&body)?;
    let context = state.context.clone();
    let outcome = tokio::task::spawn_blocking(move || app_api::collect(&context, req))
        .await
        .map_err(join_error)??;
    match outcome {
        CollectOutcome::NothingNew { .. } => Ok(StatusCode::NO_CONTENT.into_response()),
        collected @ CollectOutcome::Collected(_) => Ok(Json(collected).into_response()),
    }
}

pub async fn not_found() -> HttpError {
    HttpError::new(
        StatusCode::NOT_FOUND,
        "not found",
        Some("not_found".to_string()),
    )
}

fn join_error(err: tokio::task::JoinError) -> HttpError {
    tracing::error!(error = %err, "blocking task failed");
    HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None)
}
