//! Convenience result type alias for FileTrack.

use crate::error::AppError;

/// A specialized `Result` type for FileTrack operations.
pub type AppResult<T> = Result<T, AppError>;
