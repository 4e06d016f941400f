// handlers/public/files/record.rs - upload metadata

use axum::extract::{Path, State};

use crate::database::models::FileUpload;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::FileService;
use crate::AppState;

/// GET /files/by-user/:user_id - newest first
pub async fn files_by_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> ApiResult<Vec<FileUpload>> {
    Ok(ApiResponse::success(FileService::new(state.db.clone()).list_for_user(user_id).await?))
}

/// GET /files/:id
pub async fn file_get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<FileUpload> {
    Ok(ApiResponse::success(FileService::new(state.db.clone()).get(id).await?))
}
