//! Convenience result type alias for PairHub.

use crate::error::AppError;

/// A specialized `Result` type for PairHub operations.
pub type AppResult<T> = Result<T, AppError>;
