// handlers/public/files/review.rs - verification decisions on uploads

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::database::models::FileUpload;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::FileService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub is_verified: bool,
    pub verified_by: Option<i64>,
    pub verification_notes: Option<String>,
}

/// PUT /files/:id/verify
pub async fn file_verify(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<VerifyRequest>,
) -> ApiResult<FileUpload> {
    let file = FileService::new(state.db.clone())
        .verify(id, body.is_verified, body.verified_by, body.verification_notes.as_deref())
        .await?;
    Ok(ApiResponse::success(file))
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// PUT /files/:id/reject
pub async fn file_reject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<RejectRequest>,
) -> ApiResult<FileUpload> {
    let reason = required("reason", body.reason.as_deref())?;
    Ok(ApiResponse::success(FileService::new(state.db.clone()).reject(id, reason).await?))
}
