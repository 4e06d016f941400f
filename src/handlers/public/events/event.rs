// handlers/public/events/event.rs - events CRUD

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{Event, EventChanges, NewEvent};
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::EventService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// POST /events
pub async fn event_create(State(state): State<AppState>, Json(event): Json<NewEvent>) -> ApiResult<Event> {
    required("title", Some(event.title.as_str()))?;
    Ok(ApiResponse::created(EventService::new(state.db.clone()).create(&event).await?))
}

/// GET /events?status=
pub async fn event_list(State(state): State<AppState>, Query(query): Query<EventListQuery>) -> ApiResult<Vec<Event>> {
    let (skip, limit) = state.config.page(query.skip, query.limit);
    let status = query.status.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let events = EventService::new(state.db.clone()).list(status, skip, limit).await?;
    Ok(ApiResponse::success(events))
}

/// GET /events/:id
pub async fn event_get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Event> {
    let event = EventService::new(state.db.clone())
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event not found"))?;
    Ok(ApiResponse::success(event))
}

/// PUT /events/:id
pub async fn event_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<EventChanges>,
) -> ApiResult<Event> {
    Ok(ApiResponse::success(EventService::new(state.db.clone()).update(id, &changes).await?))
}

/// DELETE /events/:id
pub async fn event_delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    EventService::new(state.db.clone()).delete(id).await?;
    Ok(ApiResponse::success(json!({ "message": "Event deleted successfully" })))
}
