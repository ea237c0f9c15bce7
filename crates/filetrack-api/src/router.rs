//! Route definitions for the FileTrack HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use std::time::Duration;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use filetrack_core::error::AppError;

use crate::error::ApiError;
use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds.max(1));

    let api_routes = Router::new()
        .merge(file_routes())
        .merge(forward_routes())
        .merge(movement_routes())
        .merge(notification_routes())
        .merge(user_routes())
        .merge(dashboard_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .with_state(state)
}

async fn not_found() -> ApiError {
    AppError::not_found("Route not found").into()
}

fn file_routes() -> Router<AppState> {
    use handlers::file::*;
    Router::new()
        .route("/files", get(list_files).post(create_file))
        .route("/files/search", get(search_files))
        .route("/files/received", get(received_files))
        .route("/files/mine", get(my_files))
        .route("/files/department/{department}", get(files_by_department))
        .route("/files/creator/{name}", get(files_by_creator))
        .route("/files/code/{code}", get(get_file_by_code))
        .route(
            "/files/{id}",
            get(get_file).put(update_file).delete(delete_file),
        )
        .route("/files/{id}/release", post(release_file))
}

fn forward_routes() -> Router<AppState> {
    use handlers::forward::*;
    Router::new()
        .route("/forwards", get(list_forwards).post(create_forward))
        .route("/forwards/urgent", get(urgent_forwards))
        .route("/forwards/sent", get(sent_forwards))
        .route("/forwards/incoming", get(incoming_forwards))
        .route("/forwards/status/{status}", get(forwards_by_status))
        .route("/forwards/file/{code}", get(forwards_for_file))
        .route("/forwards/department/{department}", get(department_forwards))
        .route(
            "/forwards/department/{department}/pending",
            get(pending_for_department),
        )
        .route(
            "/forwards/department/{department}/stats",
            get(department_stats),
        )
        .route(
            "/forwards/{id}",
            get(get_forward).put(update_forward).delete(delete_forward),
        )
        .route("/forwards/{id}/approve", post(approve_forward))
        .route("/forwards/{id}/reject", post(reject_forward))
        .route("/forwards/{id}/receive", post(receive_forward))
        .route("/forwards/{id}/complete", post(complete_forward))
}

fn movement_routes() -> Router<AppState> {
    use handlers::movement::*;
    Router::new()
        .route("/movements", get(list_movements).post(add_movement))
        .route("/movements/file/{code}", get(movements_for_file))
        .route(
            "/movements/{id}",
            put(correct_movement).delete(delete_movement),
        )
}

fn notification_routes() -> Router<AppState> {
    use handlers::notification::*;
    Router::new()
        .route(
            "/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/read-all", put(mark_all_read))
        .route(
            "/notifications/{id}",
            get(get_notification).delete(delete_notification),
        )
        .route("/notifications/{id}/read", put(mark_read))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::me))
        .route(
            "/users/employees/{department}",
            get(handlers::user::employees),
        )
}

fn dashboard_routes() -> Router<AppState> {
    use handlers::dashboard::*;
    Router::new()
        .route("/dashboard/stats", get(stats))
        .route("/dashboard/departments", get(departments))
        .route("/dashboard/status", get(status_distribution))
        .route("/dashboard/priority", get(priority_distribution))
        .route("/dashboard/forwarding", get(forwarding))
        .route("/dashboard/user-stats", get(user_stats))
        .route("/dashboard/recent", get(recent_activity))
        .route("/dashboard/timeline", get(timeline))
}
