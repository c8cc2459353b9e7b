//! Expiry notification rendering and delivery.

pub mod service;
pub mod template;

pub use service::{ExpiryNotice, Notifier};
