//! Route definitions for the DocWatch HTTP API.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = middleware::cors::build_cors_layer(&state.server.cors);

    Router::new()
        .merge(expiry_routes())
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Manual trigger and next-run query per category
fn expiry_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/expiry/trigger/{category}",
            post(handlers::expiry::trigger),
        )
        .route(
            "/expiry/next-run/{category}",
            get(handlers::expiry::next_run),
        )
}

/// Liveness probe
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
