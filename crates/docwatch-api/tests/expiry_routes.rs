//! Router-level tests for the expiry and health endpoints.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use docwatch_api::{AppState, build_router};
use docwatch_core::config::ServerConfig;
use docwatch_core::error::AppError;
use docwatch_core::traits::MockStoreHealth;
use docwatch_entity::Category;
use docwatch_worker::MockJobControl;

fn reachable_store() -> MockStoreHealth {
    let mut store = MockStoreHealth::new();
    store.expect_is_reachable().return_const(true);
    store
}

fn app_with_store(jobs: MockJobControl, store: MockStoreHealth) -> Router {
    build_router(AppState::new(
        Arc::new(jobs),
        Arc::new(store),
        ServerConfig::default(),
    ))
}

fn app(jobs: MockJobControl) -> Router {
    app_with_store(jobs, reachable_store())
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn trigger_accepts_known_category() {
    let accepted = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
    let mut jobs = MockJobControl::new();
    jobs.expect_trigger_now()
        .withf(|c| *c == Category::Employee)
        .times(1)
        .returning(move |_| Ok(accepted));

    let (status, body) = send(app(jobs), "POST", "/expiry/trigger/Employee").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["message"],
        "Employee document expiry job triggered successfully"
    );
    assert_eq!(body["data"]["timestamp"], "2026-10-16T09:00:00Z");
}

#[tokio::test]
async fn trigger_rejects_unknown_category() {
    let mut jobs = MockJobControl::new();
    jobs.expect_trigger_now().never();

    let (status, body) = send(app(jobs), "POST", "/expiry/trigger/bogus").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("bogus"));
}

#[tokio::test]
async fn trigger_while_running_conflicts() {
    let mut jobs = MockJobControl::new();
    jobs.expect_trigger_now()
        .returning(|_| Err(AppError::conflict("Client document expiry job is already running")));

    let (status, body) = send(app(jobs), "POST", "/expiry/trigger/client").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn trigger_scheduler_failure_is_internal_error() {
    let mut jobs = MockJobControl::new();
    jobs.expect_trigger_now()
        .returning(|_| Err(AppError::internal("scheduler stopped")));

    let (status, body) = send(app(jobs), "POST", "/expiry/trigger/company").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn next_run_lists_fire_times() {
    let next = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
    let mut jobs = MockJobControl::new();
    jobs.expect_next_run_times()
        .withf(|name| name == "company")
        .times(1)
        .returning(move |_| Ok(vec![next]));

    let (status, body) = send(app(jobs), "GET", "/expiry/next-run/company").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["next_run_times"][0], "2026-10-17T12:00:00Z");
    assert!(body["data"]["current_time"].is_string());
}

#[tokio::test]
async fn next_run_rejects_unknown_category() {
    let mut jobs = MockJobControl::new();
    jobs.expect_next_run_times().returning(|name| {
        name.parse::<Category>()
            .map(|_| Vec::new())
            .map_err(AppError::from)
    });

    let (status, body) = send(app(jobs), "GET", "/expiry/next-run/bogus").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn health_reports_job_state() {
    let mut jobs = MockJobControl::new();
    jobs.expect_is_started().return_const(true);
    jobs.expect_is_running()
        .returning(|c| c == Category::Company);

    let (status, body) = send(app(jobs), "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "connected");
    assert_eq!(body["data"]["scheduler_running"], true);
    let jobs = body["data"]["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 3);
    assert_eq!(jobs[2]["job_key"], "CompanyDocumentExpiryJob");
    assert_eq!(jobs[2]["running"], true);
    assert_eq!(jobs[0]["running"], false);
}

#[tokio::test]
async fn health_reports_unreachable_store_as_degraded() {
    let mut jobs = MockJobControl::new();
    jobs.expect_is_started().return_const(true);
    jobs.expect_is_running().return_const(false);
    let mut store = MockStoreHealth::new();
    store.expect_is_reachable().times(1).return_const(false);

    let (status, body) = send(app_with_store(jobs, store), "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "degraded");
    assert_eq!(body["data"]["database"], "unreachable");
}
