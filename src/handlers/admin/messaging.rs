// handlers/admin/messaging.rs - POST /admin/send-notification

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::database::models::{NewNotification, Notification};
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{NotificationService, UserService};
use crate::AppState;

fn default_title() -> String {
    "Admin Message".to_string()
}

#[derive(Debug, Deserialize)]
pub struct AdminMessageRequest {
    pub user_id: i64,
    pub message: Option<String>,
    #[serde(default = "default_title")]
    pub title: String,
}

/// Admin messages are prefixed so recipients can tell them apart from TPO notices.
pub async fn admin_send_notification(
    State(state): State<AppState>,
    caller: Option<Extension<AuthUser>>,
    Json(body): Json<AdminMessageRequest>,
) -> ApiResult<Notification> {
    let message = required("message", body.message.as_deref())?;
    let user = UserService::new(state.db.clone()).get(body.user_id).await?;

    let notice = NewNotification::system(
        user.id,
        format!("Admin: {}", body.title),
        format!("From Admin: {}", message),
    )
    .sent_by(caller.map(|Extension(admin)| admin.user_id));

    let notification = NotificationService::new(state.db.clone()).create(&notice).await?;
    Ok(ApiResponse::created(notification))
}
