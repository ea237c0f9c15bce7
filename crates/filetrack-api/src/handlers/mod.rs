//! Route handlers organized by domain.

pub mod dashboard;
pub mod file;
pub mod forward;
pub mod health;
pub mod movement;
pub mod notification;
pub mod user;

use axum::Json;

use filetrack_core::AppResult;
use filetrack_entity::Department;

use crate::dto::ApiResponse;
use crate::error::ApiError;

/// The result of a handler that answers with the JSON envelope.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Parses a department path segment.
pub(crate) fn department(segment: &str) -> AppResult<Department> {
    segment.trim().parse()
}
