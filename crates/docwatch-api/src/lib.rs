//! # docwatch-api
//!
//! HTTP API layer for DocWatch built on Axum.
//!
//! Exposes the manual trigger and next-run endpoints for the expiry jobs,
//! a health probe, request logging, CORS, and error mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
