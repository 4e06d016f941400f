// handlers/public/events/registration.rs - event sign-ups

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::database::models::EventRegistration;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{EventService, UserService};
use crate::AppState;

/// Either field identifies the registrant; `user_id` wins when both are sent.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_id: Option<i64>,
    pub email: Option<String>,
}

/// POST /events/:id/register
pub async fn event_register(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<EventRegistration> {
    let events = EventService::new(state.db.clone());
    if events.find(event_id).await?.is_none() {
        return Err(ApiError::not_found("Event not found"));
    }

    let users = UserService::new(state.db.clone());
    let email = body.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let user_id = match (body.user_id, email) {
        (Some(id), _) => users.get(id).await?.id,
        (None, Some(email)) => {
            users
                .find_by_email(email)
                .await?
                .ok_or_else(|| ApiError::not_found("User not found"))?
                .id
        }
        (None, None) => return Err(ApiError::bad_request("Either user_id or email is required")),
    };

    if events.is_registered(event_id, user_id).await? {
        return Err(ApiError::bad_request("User already registered for this event"));
    }

    Ok(ApiResponse::created(events.register(event_id, user_id).await?))
}

/// GET /events/:id/registrations
pub async fn event_registrations(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Vec<EventRegistration>> {
    Ok(ApiResponse::success(EventService::new(state.db.clone()).registrations(event_id).await?))
}
