use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const EVENT_UPCOMING: &str = "Upcoming";
pub const EVENT_COMPLETED: &str = "Completed";
pub const EVENT_CANCELLED: &str = "Cancelled";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_time: Option<String>,
    pub event_type: Option<String>,
    pub form_url: Option<String>,
    pub status: String,
    pub registered_count: i32,
    pub max_participants: Option<i32>,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_time: Option<String>,
    pub event_type: Option<String>,
    pub form_url: Option<String>,
    pub status: Option<String>,
    pub max_participants: Option<i32>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_time: Option<String>,
    pub event_type: Option<String>,
    pub form_url: Option<String>,
    pub status: Option<String>,
    pub max_participants: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventRegistration {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub registration_status: String,
    pub registered_at: DateTime<Utc>,
}

/// Registration joined with the attendee
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RegistrantView {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}
