// handlers/tpo/dashboard.rs - TPO dashboard reads

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::database::models::ReviewItem;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ApprovedStudent, DashboardSummary, FileService, JobService, PendingStudent, ProfileService, TpoService};
use crate::types::FileStatus;
use crate::AppState;

/// GET /tpo/:user_id/profile - `{}` when the officer has no profile yet
pub async fn tpo_profile(State(state): State<AppState>, Path(user_id): Path<i64>) -> ApiResult<Value> {
    let profile = ProfileService::new(state.db.clone()).find(user_id).await?;
    let body = match profile {
        Some(profile) => serde_json::to_value(profile).map_err(|e| {
            tracing::error!("Failed to serialize profile {}: {}", user_id, e);
            ApiError::internal_server_error("Failed to load profile")
        })?,
        None => json!({}),
    };
    Ok(ApiResponse::success(body))
}

/// GET /tpo/stats/summary
pub async fn tpo_summary(State(state): State<AppState>) -> ApiResult<DashboardSummary> {
    let by_job = JobService::new(state.db.clone()).application_counts().await?;
    Ok(ApiResponse::success(TpoService::new(state.db.clone()).summary(by_job).await?))
}

/// GET /tpo/pending-profiles
pub async fn tpo_pending_profiles(State(state): State<AppState>) -> ApiResult<Vec<PendingStudent>> {
    Ok(ApiResponse::success(TpoService::new(state.db.clone()).pending_students().await?))
}

/// GET /tpo/approved-students
pub async fn tpo_approved_students(State(state): State<AppState>) -> ApiResult<Vec<ApprovedStudent>> {
    Ok(ApiResponse::success(TpoService::new(state.db.clone()).approved_students().await?))
}

/// GET /tpo/pending-resumes
pub async fn tpo_pending_resumes(State(state): State<AppState>) -> ApiResult<Vec<ReviewItem>> {
    let items = FileService::new(state.db.clone())
        .resumes_with_status(FileStatus::Pending)
        .await?;
    Ok(ApiResponse::success(items))
}

/// GET /tpo/verified-resumes
pub async fn tpo_verified_resumes(State(state): State<AppState>) -> ApiResult<Vec<ReviewItem>> {
    let items = FileService::new(state.db.clone())
        .resumes_with_status(FileStatus::Verified)
        .await?;
    Ok(ApiResponse::success(items))
}
