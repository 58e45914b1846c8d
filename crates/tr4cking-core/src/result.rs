//! Convenience result type alias for Tr4cking.

use crate::error::AppError;

/// A specialized `Result` type for Tr4cking operations.
pub type AppResult<T> = Result<T, AppError>;
