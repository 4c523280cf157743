mod errors;
mod handlers;
mod middleware;
mod state;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

pub use errors::HttpError;
pub use state::HttpState;

pub fn router(state: HttpState) -> Router<()> {
    let api = Router::new()
        .route("/query", get(handlers::query))
        .route("/plots", get(handlers::plots))
        .route("/collect", post(handlers::collect));

    Router::new()
        .nest("/api/v1", api)
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(middleware::log_requests))
        .with_state(state)
}
