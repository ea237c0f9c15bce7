//! Movement ledger handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use filetrack_database::filter::MovementFilter;
use filetrack_entity::Movement;

use crate::dto::ApiResponse;
use crate::dto::request::{AddMovementRequest, CorrectMovementRequest, MovementListParams};
use crate::error::ApiError;
use crate::extractors::{ApiPath, ApiQuery, AuthUser, ValidJson};
use crate::handlers::ApiResult;
use crate::state::AppState;

const DEFAULT_LIMIT: u64 = 100;

/// GET /api/movements?limit=&fileCode=&action=&user=
pub async fn list_movements(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(params): ApiQuery<MovementListParams>,
) -> ApiResult<Vec<Movement>> {
    let filter = MovementFilter {
        file_code: params.file_code,
        action: params.action,
        user_name: params.user,
        ..Default::default()
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 1000);
    let movements = state.services.movements.list(&filter, Some(limit)).await?;
    Ok(Json(ApiResponse::list(movements)))
}

/// POST /api/movements
pub async fn add_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<AddMovementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Movement>>), ApiError> {
    let (file_code, input) = req.into_parts();
    let movement = state.services.movements.add(&auth, &file_code, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(movement).with_message("Movement recorded successfully")),
    ))
}

/// GET /api/movements/file/{code}
pub async fn movements_for_file(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(code): ApiPath<String>,
) -> ApiResult<Vec<Movement>> {
    let movements = state.services.movements.for_file(&code).await?;
    Ok(Json(ApiResponse::list(movements)))
}

/// PUT /api/movements/{id}
pub async fn correct_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<CorrectMovementRequest>,
) -> ApiResult<Movement> {
    let movement = state
        .services
        .movements
        .correct(&auth, id, req.into())
        .await?;
    Ok(Json(
        ApiResponse::ok(movement).with_message("Movement updated successfully"),
    ))
}

/// DELETE /api/movements/{id}
pub async fn delete_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    state.services.movements.delete(&auth, id).await?;
    Ok(Json(
        ApiResponse::ok(()).with_message("Movement deleted successfully"),
    ))
}
