//! Notification handlers. Every route acts on the caller's own inbox
//! except admin creation.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

use filetrack_entity::Notification;

use crate::dto::ApiResponse;
use crate::dto::request::{CreateNotificationRequest, NotificationListParams};
use crate::error::ApiError;
use crate::extractors::{ApiPath, ApiQuery, AuthUser, PaginationParams, ValidJson};
use crate::handlers::ApiResult;
use crate::state::AppState;

/// One page of the inbox.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbox {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// GET /api/notifications?page=&limit=&unreadOnly=&type=
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<NotificationListParams>,
    ApiQuery(paging): ApiQuery<PaginationParams>,
) -> ApiResult<Inbox> {
    let listing = state
        .services
        .notifications
        .list(&auth, paging.or_first(), params.unread_only, params.kind()?)
        .await?;
    let meta = listing.page.meta();
    let count = listing.page.items.len();
    let response = ApiResponse {
        count: Some(count),
        pagination: Some(meta),
        ..ApiResponse::ok(Inbox {
            notifications: listing.page.items,
            unread_count: listing.unread_count,
        })
    };
    Ok(Json(response))
}

/// POST /api/notifications
pub async fn create_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Notification>>), ApiError> {
    let notification = state
        .services
        .notifications
        .create(&auth, req.into_input()?)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(notification))))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<CountResponse> {
    let count = state.services.notifications.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<CountResponse> {
    let count = state.services.notifications.mark_all_read(&auth).await?;
    Ok(Json(
        ApiResponse::ok(CountResponse { count })
            .with_message("All notifications marked as read"),
    ))
}

/// GET /api/notifications/{id}
pub async fn get_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Notification> {
    let notification = state.services.notifications.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Notification> {
    let notification = state.services.notifications.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    state.services.notifications.delete(&auth, id).await?;
    Ok(Json(
        ApiResponse::ok(()).with_message("Notification deleted successfully"),
    ))
}
