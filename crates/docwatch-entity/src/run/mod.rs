//! Notification job run records.

pub mod model;
pub mod status;

pub use model::NotificationJobRun;
pub use status::{RunStatus, TriggerSource};
