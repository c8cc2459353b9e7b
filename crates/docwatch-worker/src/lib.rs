//! Expiry scanning and scheduling for DocWatch.
//!
//! This crate provides:
//! - One generic scan job, instantiated per document category
//! - A non-reentrant run guard shared by scheduled and manual fires
//! - A cron scheduler with stable per-category job and trigger keys

pub mod control;
pub mod guard;
pub mod job;
pub mod scheduler;

pub use control::JobControl;
#[cfg(any(test, feature = "mock"))]
pub use control::MockJobControl;
pub use guard::{RunGuard, RunPermit};
pub use job::ExpiryScanJob;
pub use scheduler::ExpiryScheduler;
