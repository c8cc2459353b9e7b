//! # docwatch-entity
//!
//! Domain models for DocWatch. Every struct in this crate is a transient
//! value object: expiry candidates and parent entities are read from the
//! document store for the duration of one scan, and job runs exist only as
//! log output and API responses.
//!
//! This crate has **no** internal dependencies on other DocWatch crates.

pub mod category;
pub mod document;
pub mod run;

pub use category::{Category, UnknownCategory};
pub use document::{ExpiryCandidate, ParentEntity};
pub use run::{NotificationJobRun, RunStatus, TriggerSource};
