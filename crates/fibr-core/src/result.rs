//! Convenience result type alias for Fibr.

use crate::error::AppError;

/// A specialized `Result` type for Fibr operations.
pub type AppResult<T> = Result<T, AppError>;
