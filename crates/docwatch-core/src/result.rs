//! Convenience result type alias for DocWatch.

use crate::error::AppError;

/// A specialized `Result` type for DocWatch operations.
pub type AppResult<T> = Result<T, AppError>;
