// handlers/admin/accounts.rs - account listing, detail and lifecycle

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, local_account_id};
use crate::database::models::{NewUser, Profile, User};
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AccountRow, AdminService, FileService, ProfileService, UserService};
use crate::types::UserRole;
use crate::AppState;

/// GET /admin/users
pub async fn admin_users(State(state): State<AppState>) -> ApiResult<Vec<AccountRow>> {
    Ok(ApiResponse::success(AdminService::new(state.db.clone()).accounts(None).await?))
}

/// GET /admin/students
pub async fn admin_students(State(state): State<AppState>) -> ApiResult<Vec<AccountRow>> {
    let rows = AdminService::new(state.db.clone())
        .accounts(Some(UserRole::Student))
        .await?;
    Ok(ApiResponse::success(rows))
}

/// GET /admin/tpos
pub async fn admin_tpos(State(state): State<AppState>) -> ApiResult<Vec<AccountRow>> {
    let rows = AdminService::new(state.db.clone()).accounts(Some(UserRole::Tpo)).await?;
    Ok(ApiResponse::success(rows))
}

#[derive(Debug, Serialize)]
pub struct AccountDetail {
    #[serde(flatten)]
    pub user: User,
    pub status: &'static str,
    pub profile: Option<Profile>,
    pub has_verified_resume: bool,
    pub has_offer_letter: bool,
    pub resume_file_id: Option<i64>,
    pub offer_letter_file_id: Option<i64>,
}

/// GET /admin/user/:id
pub async fn admin_user_detail(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<AccountDetail> {
    let user = UserService::new(state.db.clone()).get(id).await?;
    let profile = ProfileService::new(state.db.clone()).find(id).await?;
    let flags = FileService::new(state.db.clone()).document_flags(id).await?;

    Ok(ApiResponse::success(AccountDetail {
        status: user.status(),
        user,
        profile,
        has_verified_resume: flags.has_verified_resume(),
        has_offer_letter: flags.has_offer_letter(),
        resume_file_id: flags.resume_file_id,
        offer_letter_file_id: flags.offer_letter_file_id,
    }))
}

#[derive(Debug, Serialize)]
pub struct AccountAction {
    pub message: String,
    pub user: User,
}

fn action(verb: &str, user: User) -> ApiResponse<AccountAction> {
    tracing::info!("Admin {} user {}", verb, user.id);
    ApiResponse::success(AccountAction {
        message: format!("User {} successfully", verb),
        user,
    })
}

/// PUT /admin/user/:id/approve
pub async fn admin_approve_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<AccountAction> {
    let user = UserService::new(state.db.clone()).set_approved(id, true).await?;
    Ok(action("approved", user))
}

/// PUT /admin/user/:id/reject
pub async fn admin_reject_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<AccountAction> {
    let user = UserService::new(state.db.clone()).set_approved(id, false).await?;
    Ok(action("rejected", user))
}

/// PUT /admin/user/:id/activate
pub async fn admin_activate_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<AccountAction> {
    let user = UserService::new(state.db.clone()).set_active(id, true).await?;
    Ok(action("activated", user))
}

/// PUT /admin/user/:id/deactivate
pub async fn admin_deactivate_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<AccountAction> {
    let user = UserService::new(state.db.clone()).set_active(id, false).await?;
    Ok(action("deactivated", user))
}

#[derive(Debug, Deserialize)]
pub struct AdminCreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

/// POST /admin/create-user - accounts created here skip approval
pub async fn admin_create_user(
    State(state): State<AppState>,
    Json(body): Json<AdminCreateUserRequest>,
) -> ApiResult<User> {
    let email = required("email", body.email.as_deref())?;
    let password = required("password", body.password.as_deref())?;

    let users = UserService::new(state.db.clone());
    if users.email_taken(email).await? {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let user = users
        .create(NewUser {
            clerk_user_id: local_account_id("admin_created"),
            email: email.to_string(),
            first_name: body.first_name,
            last_name: body.last_name,
            phone_number: body.phone_number,
            role: body.role,
            hashed_password: Some(hash_password(password)?),
            is_approved: true,
        })
        .await?;

    tracing::info!("Admin created {} account {}", user.role, user.id);
    Ok(ApiResponse::created(user))
}
