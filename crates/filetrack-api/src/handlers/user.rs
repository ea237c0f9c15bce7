//! User directory handlers.

use axum::Json;
use axum::extract::State;

use filetrack_auth::Principal;
use filetrack_entity::User;

use crate::dto::ApiResponse;
use crate::extractors::{ApiPath, AuthUser};
use crate::handlers::{ApiResult, department};
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(auth: AuthUser) -> ApiResult<Principal> {
    Ok(Json(ApiResponse::ok(auth.0.principal)))
}

/// GET /api/users/employees/{department}
pub async fn employees(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(segment): ApiPath<String>,
) -> ApiResult<Vec<User>> {
    let users = state
        .services
        .directory
        .employees(&auth, department(&segment)?)
        .await?;
    Ok(Json(ApiResponse::list(users)))
}
