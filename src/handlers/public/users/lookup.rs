// handlers/public/users/lookup.rs - read-only user lookups

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::types::UserRole;
use crate::AppState;

/// What the frontend needs to route a signed-in user
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    pub clerk_user_id: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            clerk_user_id: user.clerk_user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

async fn summary_by_email(state: &AppState, email: &str) -> ApiResult<UserSummary> {
    let user = UserService::new(state.db.clone())
        .find_by_email(email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user.into()))
}

/// GET /users/by-email?email=
pub async fn user_by_email_query(State(state): State<AppState>, Query(query): Query<EmailQuery>) -> ApiResult<UserSummary> {
    let email = required("email", query.email.as_deref())?;
    summary_by_email(&state, email).await
}

/// GET /users/by-email/:email
pub async fn user_by_email(State(state): State<AppState>, Path(email): Path<String>) -> ApiResult<UserSummary> {
    summary_by_email(&state, &email).await
}

/// GET /users/clerk/:clerk_user_id
pub async fn user_by_clerk_id(State(state): State<AppState>, Path(clerk_user_id): Path<String>) -> ApiResult<User> {
    let user = UserService::new(state.db.clone())
        .find_by_clerk_id(&clerk_user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user))
}

/// GET /users/:id
pub async fn user_get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<User> {
    Ok(ApiResponse::success(UserService::new(state.db.clone()).get(id).await?))
}
