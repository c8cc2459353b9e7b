//! Expiry job handlers: manual trigger and next-run query.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;

use docwatch_core::error::AppError;
use docwatch_entity::Category;

use crate::dto::response::{ApiResponse, NextRunResponse, TriggerResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /expiry/trigger/{category}
pub async fn trigger(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<TriggerResponse>>, ApiError> {
    let category: Category = category.parse().map_err(AppError::from)?;
    let timestamp = state.jobs.trigger_now(category).await?;

    Ok(Json(ApiResponse::ok(TriggerResponse {
        message: format!(
            "{} document expiry job triggered successfully",
            category.label()
        ),
        timestamp,
    })))
}

/// GET /expiry/next-run/{category}
pub async fn next_run(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<NextRunResponse>>, ApiError> {
    let next_run_times = state.jobs.next_run_times(&category).await?;

    Ok(Json(ApiResponse::ok(NextRunResponse {
        next_run_times,
        current_time: Utc::now(),
    })))
}
