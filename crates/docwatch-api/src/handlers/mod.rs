//! HTTP request handlers.

pub mod expiry;
pub mod health;
