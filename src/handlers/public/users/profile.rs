// handlers/public/users/profile.rs - /users/:id/profile

use axum::{
    extract::{Path, State},
    Json,
};

use crate::database::models::{Profile, ProfileFields};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ProfileService, UserService};
use crate::AppState;

/// POST /users/:id/profile - create or merge
pub async fn profile_upsert(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(fields): Json<ProfileFields>,
) -> ApiResult<Profile> {
    UserService::new(state.db.clone()).get(user_id).await?;
    let profile = ProfileService::new(state.db.clone()).upsert(user_id, &fields).await?;
    Ok(ApiResponse::success(profile))
}

/// GET /users/:id/profile
pub async fn profile_get(State(state): State<AppState>, Path(user_id): Path<i64>) -> ApiResult<Profile> {
    let profile = ProfileService::new(state.db.clone())
        .find(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    Ok(ApiResponse::success(profile))
}

/// PUT /users/:id/profile
pub async fn profile_update(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(fields): Json<ProfileFields>,
) -> ApiResult<Profile> {
    Ok(ApiResponse::success(ProfileService::new(state.db.clone()).update(user_id, &fields).await?))
}
