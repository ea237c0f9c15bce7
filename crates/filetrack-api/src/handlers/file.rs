//! File record handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use filetrack_entity::File;

use crate::dto::ApiResponse;
use crate::dto::request::{
    CreateFileRequest, FileListParams, MyFilesParams, ReleaseFileRequest, SearchParams,
    UpdateFileRequest, parse_opt,
};
use crate::error::ApiError;
use crate::extractors::{ApiPath, ApiQuery, AuthUser, PaginationParams, ValidJson};
use crate::handlers::{ApiResult, department};
use crate::state::AppState;

/// GET /api/files
///
/// Paginated when `page` is given, otherwise the whole scoped list.
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(filters): ApiQuery<FileListParams>,
    ApiQuery(paging): ApiQuery<PaginationParams>,
) -> ApiResult<Vec<File>> {
    let query = filters.into_query()?;
    let files = &state.services.file_queries;
    let response = match paging.page_request() {
        Some(page) => ApiResponse::page(files.list_page(&auth, query, page).await?),
        None => ApiResponse::list(files.list(&auth, query).await?),
    };
    Ok(Json(response))
}

/// POST /api/files
pub async fn create_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateFileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<File>>), ApiError> {
    let file = state.services.files.create(&auth, req.into_input()?).await?;
    let message = format!("File {} created successfully", file.code);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(file).with_message(message)),
    ))
}

/// GET /api/files/search?q=...&department=...
pub async fn search_files(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> ApiResult<Vec<File>> {
    let department = parse_opt(params.department.as_deref())?;
    let files = state
        .services
        .file_queries
        .search(&auth, &params.q, department)
        .await?;
    Ok(Json(ApiResponse::list(files)))
}

/// GET /api/files/received
pub async fn received_files(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<File>> {
    let files = state.services.file_queries.received(&auth).await?;
    Ok(Json(ApiResponse::list(files)))
}

/// GET /api/files/mine?status=Received,Released
pub async fn my_files(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<MyFilesParams>,
) -> ApiResult<Vec<File>> {
    let files = state
        .services
        .file_queries
        .my_files(&auth, params.statuses()?)
        .await?;
    Ok(Json(ApiResponse::list(files)))
}

/// GET /api/files/department/{department}
pub async fn files_by_department(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(segment): ApiPath<String>,
) -> ApiResult<Vec<File>> {
    let files = state
        .services
        .file_queries
        .by_department(&auth, department(&segment)?)
        .await?;
    Ok(Json(ApiResponse::list(files)))
}

/// GET /api/files/creator/{name}
pub async fn files_by_creator(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<Vec<File>> {
    let files = state.services.file_queries.by_creator(&auth, &name).await?;
    Ok(Json(ApiResponse::list(files)))
}

/// GET /api/files/code/{code}
pub async fn get_file_by_code(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(code): ApiPath<String>,
) -> ApiResult<File> {
    let file = state.services.files.get_by_code(&code).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<File> {
    let file = state.services.files.get(id).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// PUT /api/files/{id}
pub async fn update_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<UpdateFileRequest>,
) -> ApiResult<File> {
    let file = state
        .services
        .files
        .update(&auth, id, req.into_input()?)
        .await?;
    Ok(Json(
        ApiResponse::ok(file).with_message("File updated successfully"),
    ))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    state.services.files.delete(&auth, id).await?;
    Ok(Json(
        ApiResponse::ok(()).with_message("File deleted successfully"),
    ))
}

/// POST /api/files/{id}/release
pub async fn release_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<ReleaseFileRequest>,
) -> ApiResult<File> {
    let outcome = state
        .services
        .workflow
        .release(&auth, id, &req.assigned_to, req.remarks)
        .await?;
    Ok(Json(ApiResponse::ok(outcome.data).with_message(outcome.message)))
}
