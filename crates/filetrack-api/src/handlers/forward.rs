//! Forward workflow handlers.
//!
//! Transitions answer with the resulting forward and the outcome
//! message produced by the workflow engine.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use filetrack_entity::{Forward, ForwardStatus};
use filetrack_service::forward::DepartmentForwardStats;

use crate::dto::ApiResponse;
use crate::dto::request::{
    ApproveForwardRequest, CompleteForwardRequest, CreateForwardRequest, DepartmentForwardParams,
    ForwardListParams, RejectForwardRequest, UpdateForwardRequest,
};
use crate::error::ApiError;
use crate::extractors::{ApiPath, ApiQuery, AuthUser, PaginationParams, ValidJson};
use crate::handlers::{ApiResult, department};
use crate::state::AppState;

/// GET /api/forwards
pub async fn list_forwards(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ForwardListParams>,
) -> ApiResult<Vec<Forward>> {
    let forwards = state
        .services
        .forward_queries
        .list(&auth, params.into_query()?)
        .await?;
    Ok(Json(ApiResponse::list(forwards)))
}

/// POST /api/forwards
pub async fn create_forward(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateForwardRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Forward>>), ApiError> {
    let outcome = state
        .services
        .workflow
        .create_forward(&auth, req.into_input()?)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(outcome.data).with_message(outcome.message)),
    ))
}

/// GET /api/forwards/urgent
pub async fn urgent_forwards(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<Forward>> {
    let forwards = state.services.forward_queries.urgent(&auth).await?;
    Ok(Json(ApiResponse::list(forwards)))
}

/// GET /api/forwards/sent
pub async fn sent_forwards(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<Forward>> {
    let forwards = state.services.forward_queries.sent(&auth).await?;
    Ok(Json(ApiResponse::list(forwards)))
}

/// GET /api/forwards/incoming
pub async fn incoming_forwards(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<Forward>> {
    let forwards = state.services.forward_queries.incoming(&auth).await?;
    Ok(Json(ApiResponse::list(forwards)))
}

/// GET /api/forwards/status/{status}
pub async fn forwards_by_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(status): ApiPath<String>,
) -> ApiResult<Vec<Forward>> {
    let status: ForwardStatus = status.trim().parse()?;
    let forwards = state
        .services
        .forward_queries
        .by_status(&auth, status)
        .await?;
    Ok(Json(ApiResponse::list(forwards)))
}

/// GET /api/forwards/file/{code}
pub async fn forwards_for_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(code): ApiPath<String>,
) -> ApiResult<Vec<Forward>> {
    let forwards = state
        .services
        .forward_queries
        .for_file(&auth, &code)
        .await?;
    Ok(Json(ApiResponse::list(forwards)))
}

/// GET /api/forwards/department/{department}?status=...&urgent=true&page=1
pub async fn department_forwards(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(segment): ApiPath<String>,
    ApiQuery(params): ApiQuery<DepartmentForwardParams>,
    ApiQuery(paging): ApiQuery<PaginationParams>,
) -> ApiResult<Vec<Forward>> {
    let page = state
        .services
        .forward_queries
        .department_forwards(
            &auth,
            department(&segment)?,
            params.status()?,
            params.urgent,
            paging.or_first(),
        )
        .await?;
    Ok(Json(ApiResponse::page(page)))
}

/// GET /api/forwards/department/{department}/pending
pub async fn pending_for_department(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(segment): ApiPath<String>,
) -> ApiResult<Vec<Forward>> {
    let forwards = state
        .services
        .forward_queries
        .pending_for_department(&auth, department(&segment)?)
        .await?;
    Ok(Json(ApiResponse::list(forwards)))
}

/// GET /api/forwards/department/{department}/stats
pub async fn department_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(segment): ApiPath<String>,
) -> ApiResult<DepartmentForwardStats> {
    let stats = state
        .services
        .forward_queries
        .department_stats(&auth, department(&segment)?)
        .await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/forwards/{id}
pub async fn get_forward(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Forward> {
    let forward = state.services.forward_queries.get(id).await?;
    Ok(Json(ApiResponse::ok(forward)))
}

/// PUT /api/forwards/{id}
pub async fn update_forward(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<UpdateForwardRequest>,
) -> ApiResult<Forward> {
    let forward = state
        .services
        .workflow
        .update_forward(&auth, id, req.into_input()?)
        .await?;
    Ok(Json(
        ApiResponse::ok(forward).with_message("Forward updated successfully"),
    ))
}

/// DELETE /api/forwards/{id}
pub async fn delete_forward(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    state.services.workflow.delete_forward(&auth, id).await?;
    Ok(Json(
        ApiResponse::ok(()).with_message("Forward deleted successfully"),
    ))
}

/// POST /api/forwards/{id}/approve
pub async fn approve_forward(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<ApproveForwardRequest>,
) -> ApiResult<Forward> {
    let outcome = state
        .services
        .workflow
        .approve(&auth, id, &req.distributed_to, req.admin_remarks)
        .await?;
    Ok(Json(ApiResponse::ok(outcome.data).with_message(outcome.message)))
}

/// POST /api/forwards/{id}/reject
pub async fn reject_forward(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<RejectForwardRequest>,
) -> ApiResult<Forward> {
    let outcome = state
        .services
        .workflow
        .reject(&auth, id, &req.rejection_reason)
        .await?;
    Ok(Json(ApiResponse::ok(outcome.data).with_message(outcome.message)))
}

/// POST /api/forwards/{id}/receive
pub async fn receive_forward(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Forward> {
    let outcome = state.services.workflow.receive(&auth, id).await?;
    Ok(Json(ApiResponse::ok(outcome.data).with_message(outcome.message)))
}

/// POST /api/forwards/{id}/complete
pub async fn complete_forward(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<CompleteForwardRequest>,
) -> ApiResult<Forward> {
    let outcome = state
        .services
        .workflow
        .complete(&auth, id, req.remarks)
        .await?;
    Ok(Json(ApiResponse::ok(outcome.data).with_message(outcome.message)))
}
