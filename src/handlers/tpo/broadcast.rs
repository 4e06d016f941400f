// handlers/tpo/broadcast.rs - bulk notifications to students

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::database::models::BroadcastGroup;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NotificationService;
use crate::AppState;

use super::sender;

#[derive(Debug, Default, Deserialize)]
pub struct BroadcastFilters {
    pub degree: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub filters: BroadcastFilters,
    pub sent_by: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResult {
    pub count: u64,
    pub message: String,
}

/// POST /tpo/notifications/broadcast
pub async fn tpo_broadcast(
    State(state): State<AppState>,
    caller: Option<Extension<AuthUser>>,
    Json(body): Json<BroadcastRequest>,
) -> ApiResult<BroadcastResult> {
    let title = required("title", body.title.as_deref())?;
    let message = required("message", body.message.as_deref())?;

    let count = NotificationService::new(state.db.clone())
        .broadcast_to_students(
            title,
            message,
            body.filters.degree.as_deref(),
            body.filters.year.as_deref(),
            sender(body.sent_by, caller),
        )
        .await?;

    Ok(ApiResponse::success(BroadcastResult {
        count,
        message: format!("Sent to {} students", count),
    }))
}

/// GET /tpo/notifications/history
pub async fn tpo_broadcast_history(State(state): State<AppState>) -> ApiResult<Vec<BroadcastGroup>> {
    Ok(ApiResponse::success(NotificationService::new(state.db.clone()).broadcast_history().await?))
}
