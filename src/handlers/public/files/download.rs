// handlers/public/files/download.rs - presigned links and byte delivery

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Attachment};
use crate::services::FileService;
use crate::storage::ObjectStore;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PresignedUrl {
    pub url: String,
}

fn is_absolute_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// GET /files/:id/presigned
pub async fn file_presigned(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<PresignedUrl> {
    let file = FileService::new(state.db.clone()).get(id).await?;
    let store = state
        .storage
        .resolve(&file.file_path)
        .ok_or_else(|| ApiError::bad_request("File is not stored in a supported location"))?;

    let url = store.download_url(file.id, &file.file_path)?;
    Ok(ApiResponse::success(PresignedUrl { url }))
}

/// GET /files/:id/download
///
/// Local bytes are streamed back; cloud objects and legacy absolute URLs redirect.
pub async fn file_download(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response, ApiError> {
    let file = FileService::new(state.db.clone()).get(id).await?;
    let local = state.storage.local();

    if local.owns(&file.file_path) {
        let bytes = local.read_path(&file.file_path).await?;
        return Ok(Attachment::new(file.file_name, file.mime_type, bytes).into_response());
    }

    if let Some(store) = state.storage.resolve(&file.file_path) {
        let url = store.download_url(file.id, &file.file_path)?;
        return Ok(Redirect::temporary(&url).into_response());
    }

    match file.file_url.as_deref() {
        Some(url) if is_absolute_url(url) => Ok(Redirect::temporary(url).into_response()),
        _ => Err(ApiError::not_found("File content not found")),
    }
}

/// GET /files/local/:name
pub async fn file_local(State(state): State<AppState>, Path(name): Path<String>) -> Result<Attachment, ApiError> {
    let bytes = state.storage.local().read_named(&name).await?;
    Ok(Attachment::new(name, "application/octet-stream", bytes))
}
