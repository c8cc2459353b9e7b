//! # docwatch-service
//!
//! Turns an expiry notice into a rendered HTML message and hands it to the
//! mail capability.
//!
//! Services follow constructor injection: the mail sender and settings are
//! provided at construction time.

pub mod mail;
pub mod notifier;

pub use mail::GraphMailSender;
pub use notifier::{ExpiryNotice, Notifier};
