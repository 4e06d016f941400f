// handlers/public/users/account.rs - POST /users, PUT/DELETE /users/:id

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{NewUser, User, UserChanges};
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::types::UserRole;
use crate::AppState;

/// Account mirrored from the identity provider
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub clerk_user_id: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

/// POST /users
pub async fn user_create(State(state): State<AppState>, Json(body): Json<CreateUserRequest>) -> ApiResult<User> {
    let clerk_user_id = required("clerk_user_id", body.clerk_user_id.as_deref())?;
    let email = required("email", body.email.as_deref())?;

    let users = UserService::new(state.db.clone());
    if users.email_taken(email).await? {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let user = users
        .create(NewUser {
            clerk_user_id: clerk_user_id.to_string(),
            email: email.to_string(),
            first_name: body.first_name,
            last_name: body.last_name,
            phone_number: body.phone_number,
            role: body.role,
            hashed_password: None,
            is_approved: false,
        })
        .await?;

    tracing::info!("Created user {} ({})", user.id, user.role);
    Ok(ApiResponse::created(user))
}

/// PUT /users/:id
pub async fn user_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<UserChanges>,
) -> ApiResult<User> {
    if let Some(email) = changes.email.as_deref() {
        required("email", Some(email))?;
    }
    Ok(ApiResponse::success(UserService::new(state.db.clone()).update(id, &changes).await?))
}

/// DELETE /users/:id
pub async fn user_delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    UserService::new(state.db.clone()).delete(id).await?;
    Ok(ApiResponse::success(json!({ "message": "User deleted successfully" })))
}
