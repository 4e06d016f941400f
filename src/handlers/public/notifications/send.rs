// handlers/public/notifications/send.rs - POST /notifications/send

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::database::models::{NewNotification, Notification};
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{NotificationService, UserService};
use crate::AppState;

fn default_title() -> String {
    "Message from TPO".to_string()
}

#[derive(Debug, Deserialize)]
pub struct SendToStudentRequest {
    pub student_email: Option<String>,
    pub message: Option<String>,
    #[serde(default = "default_title")]
    pub title: String,
    pub sent_by: Option<i64>,
}

/// Direct message to one student, addressed by email
pub async fn notification_send(
    State(state): State<AppState>,
    Json(body): Json<SendToStudentRequest>,
) -> ApiResult<Notification> {
    let email = required("student_email", body.student_email.as_deref())?;
    let message = required("message", body.message.as_deref())?;

    let student = UserService::new(state.db.clone())
        .find_by_email(email)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let notice = NewNotification::system(student.id, body.title, message).sent_by(body.sent_by);
    let notification = NotificationService::new(state.db.clone()).create(&notice).await?;
    Ok(ApiResponse::created(notification))
}
