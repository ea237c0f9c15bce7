//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::ApiResponse;
use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.config.database.backend.as_str().to_string(),
        timestamp: chrono::Utc::now(),
    }))
}
