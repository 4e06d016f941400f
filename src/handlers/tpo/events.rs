// handlers/tpo/events.rs - GET /tpo/events and registrants per event

use axum::extract::{Path, Query, State};

use crate::database::models::{Event, RegistrantView};
use crate::error::ApiError;
use crate::handlers::PageQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::EventService;
use crate::AppState;

/// GET /tpo/events - latest event date first
pub async fn tpo_events(State(state): State<AppState>, Query(page): Query<PageQuery>) -> ApiResult<Vec<Event>> {
    let (skip, limit) = page.resolve(&state.config);
    Ok(ApiResponse::success(EventService::new(state.db.clone()).list_by_date(skip, limit).await?))
}

/// GET /tpo/events/:id/registrations - with registrant name and email
pub async fn tpo_event_registrants(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Vec<RegistrantView>> {
    let events = EventService::new(state.db.clone());
    if events.find(event_id).await?.is_none() {
        return Err(ApiError::not_found("Event not found"));
    }
    Ok(ApiResponse::success(events.registrants(event_id).await?))
}
