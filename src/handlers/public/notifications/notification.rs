// handlers/public/notifications/notification.rs - notification CRUD and read state

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{NewNotification, Notification};
use crate::error::ApiError;
use crate::handlers::{required, PageQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::NotificationService;
use crate::AppState;

/// POST /notifications
pub async fn notification_create(
    State(state): State<AppState>,
    Json(new): Json<NewNotification>,
) -> ApiResult<Notification> {
    required("title", Some(new.title.as_str()))?;
    required("message", Some(new.message.as_str()))?;
    Ok(ApiResponse::created(NotificationService::new(state.db.clone()).create(&new).await?))
}

/// GET /notifications
pub async fn notification_list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Vec<Notification>> {
    let (skip, limit) = page.resolve(&state.config);
    Ok(ApiResponse::success(NotificationService::new(state.db.clone()).list(skip, limit).await?))
}

/// GET /notifications/user/:user_id - newest first
pub async fn notification_list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Vec<Notification>> {
    let (skip, limit) = page.resolve(&state.config);
    let notifications = NotificationService::new(state.db.clone())
        .list_for_user(user_id, skip, limit)
        .await?;
    Ok(ApiResponse::success(notifications))
}

/// GET /notifications/:id
pub async fn notification_get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Notification> {
    let notification = NotificationService::new(state.db.clone())
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;
    Ok(ApiResponse::success(notification))
}

#[derive(Debug, Deserialize)]
pub struct ReadStateRequest {
    pub is_read: bool,
}

/// PUT /notifications/:id
pub async fn notification_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ReadStateRequest>,
) -> ApiResult<Notification> {
    Ok(ApiResponse::success(
        NotificationService::new(state.db.clone()).set_read(id, body.is_read).await?,
    ))
}

/// DELETE /notifications/:id
pub async fn notification_delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    NotificationService::new(state.db.clone()).delete(id).await?;
    Ok(ApiResponse::success(json!({ "message": "Notification deleted successfully" })))
}
