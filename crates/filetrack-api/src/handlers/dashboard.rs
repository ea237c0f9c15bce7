//! Dashboard handlers.

use axum::Json;
use axum::extract::State;

use filetrack_entity::Movement;
use filetrack_service::report::{
    DashboardStats, DepartmentBreakdown, ForwardingStats, PriorityCount, StatusCount, UserStats,
};

use crate::dto::ApiResponse;
use crate::dto::request::{DaysParam, DepartmentParam, LimitParam};
use crate::extractors::{ApiQuery, AuthUser};
use crate::handlers::ApiResult;
use crate::state::AppState;

/// GET /api/dashboard/stats?department=
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<DepartmentParam>,
) -> ApiResult<DashboardStats> {
    let stats = state
        .services
        .reports
        .dashboard_stats(&auth, params.department()?)
        .await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/dashboard/departments
pub async fn departments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<DepartmentBreakdown>> {
    let rows = state.services.reports.department_breakdown(&auth).await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// GET /api/dashboard/status
pub async fn status_distribution(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<StatusCount>> {
    let rows = state.services.reports.status_distribution(&auth).await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// GET /api/dashboard/priority
pub async fn priority_distribution(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<PriorityCount>> {
    let rows = state.services.reports.priority_distribution(&auth).await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// GET /api/dashboard/forwarding
pub async fn forwarding(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ForwardingStats> {
    let stats = state.services.reports.forwarding_stats(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/dashboard/user-stats
pub async fn user_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<UserStats>> {
    let rows = state.services.reports.user_stats(&auth).await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// GET /api/dashboard/recent?limit=
pub async fn recent_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<LimitParam>,
) -> ApiResult<Vec<Movement>> {
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let rows = state.services.reports.recent_activity(&auth, limit).await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// GET /api/dashboard/timeline?days=
pub async fn timeline(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<DaysParam>,
) -> ApiResult<Vec<Movement>> {
    let days = params.days.unwrap_or(7).clamp(1, 365);
    let rows = state.services.reports.timeline(&auth, days).await?;
    Ok(Json(ApiResponse::list(rows)))
}
