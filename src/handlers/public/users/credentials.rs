// handlers/public/users/credentials.rs - register, login and password reset

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::{generate_jwt, generate_reset_token, hash_password, local_account_id, verify_password, Claims};
use crate::database::models::NewUser;
use crate::error::ApiError;
use crate::handlers::required;
use crate::mail::{password_reset_mail, reset_link};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::types::UserRole;
use crate::AppState;

/// Returned for unknown emails too, so the endpoint can't be used to probe accounts
pub const FORGOT_PASSWORD_MESSAGE: &str = "If an account exists for that email, a password reset link has been sent.";

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_RESET_TOKEN: &str = "Invalid or expired reset token";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
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

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
}

/// POST /users/register
pub async fn user_register(State(state): State<AppState>, Json(body): Json<RegisterRequest>) -> ApiResult<RegisteredUser> {
    let email = required("email", body.email.as_deref())?;
    let password = required("password", body.password.as_deref())?;

    let users = UserService::new(state.db.clone());
    if users.email_taken(email).await? {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let user = users
        .create(NewUser {
            clerk_user_id: local_account_id("local"),
            email: email.to_string(),
            first_name: body.first_name,
            last_name: body.last_name,
            phone_number: body.phone_number,
            role: body.role,
            hashed_password: Some(hash_password(password)?),
            is_approved: false,
        })
        .await?;

    tracing::info!("Registered user {} as {}", user.id, user.role);
    Ok(ApiResponse::created(RegisteredUser {
        id: user.id,
        email: user.email,
        role: user.role,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub clerk_user_id: String,
    pub is_approved: bool,
    pub profile_complete: bool,
    pub token: String,
    pub token_type: &'static str,
    /// Seconds
    pub expires_in: u64,
}

/// POST /users/login
pub async fn user_login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    let email = required("email", body.email.as_deref())?;
    let password = required("password", body.password.as_deref())?;

    let user = UserService::new(state.db.clone()).find_by_email(email).await?;
    let user = match user {
        Some(user) if user.hashed_password.as_deref().is_some_and(|hash| verify_password(password, hash)) => user,
        _ => {
            tracing::warn!("Failed login attempt for {}", email);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let security = &state.config.security;
    let claims = Claims::new(user.id, user.email.clone(), user.role, security.jwt_expiry_hours);
    let token = generate_jwt(&claims, security)?;

    tracing::info!("User {} logged in", user.id);
    Ok(ApiResponse::success(LoginResponse {
        id: user.id,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        role: user.role,
        clerk_user_id: user.clerk_user_id,
        is_approved: user.is_approved,
        profile_complete: user.profile_complete,
        token,
        token_type: "bearer",
        expires_in: security.jwt_expiry_hours * 3600,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// POST /users/forgot-password
pub async fn forgot_password(State(state): State<AppState>, Json(body): Json<ForgotPasswordRequest>) -> ApiResult<Value> {
    let email = required("email", body.email.as_deref())?;
    let generic = || ApiResponse::success(json!({ "message": FORGOT_PASSWORD_MESSAGE }));

    let users = UserService::new(state.db.clone());
    let Some(user) = users.find_by_email(email).await? else {
        tracing::info!("Password reset requested for unknown email");
        return Ok(generic());
    };

    let ttl = state.config.security.reset_token_ttl_minutes;
    let issued = users.issue_reset_token(user.id, &generate_reset_token(), ttl).await?;

    let link = reset_link(&state.config.mail.frontend_url, &issued.token);
    if let Err(e) = state.mailer.send(password_reset_mail(&user.email, &link, ttl)).await {
        // A token nobody received must not stay redeemable
        users.revoke_reset_token(issued.id).await?;
        return Err(e.into());
    }

    tracing::info!("Issued password reset token for user {}", user.id);
    Ok(generic())
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub new_password: Option<String>,
}

/// POST /users/reset-password
pub async fn reset_password(State(state): State<AppState>, Json(body): Json<ResetPasswordRequest>) -> ApiResult<Value> {
    let token = required("token", body.token.as_deref())?;
    let new_password = required("new_password", body.new_password.as_deref())?;

    let users = UserService::new(state.db.clone());
    let stored = users
        .find_reset_token(token)
        .await?
        .filter(|t| t.is_redeemable(Utc::now()))
        .ok_or_else(|| {
            tracing::warn!("Rejected invalid or expired reset token");
            ApiError::bad_request(INVALID_RESET_TOKEN)
        })?;

    if !users.redeem_reset_token(&stored, &hash_password(new_password)?).await? {
        tracing::warn!("Reset token {} was spent concurrently", stored.id);
        return Err(ApiError::bad_request(INVALID_RESET_TOKEN));
    }
    Ok(ApiResponse::success(json!({ "message": "Password has been reset successfully" })))
}
