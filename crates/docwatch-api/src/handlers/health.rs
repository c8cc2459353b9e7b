//! Health check handler.

use axum::Json;
use axum::extract::State;

use docwatch_entity::Category;

use crate::dto::response::{ApiResponse, HealthResponse, JobHealth};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let jobs = Category::ALL
        .into_iter()
        .map(|category| JobHealth {
            category,
            job_key: category.job_key().to_string(),
            running: state.jobs.is_running(category),
        })
        .collect();

    let reachable = state.store.is_reachable().await;

    Json(ApiResponse::ok(HealthResponse {
        status: if reachable { "ok" } else { "degraded" }.to_string(),
        database: if reachable { "connected" } else { "unreachable" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        scheduler_running: state.jobs.is_started(),
        jobs,
    }))
}
