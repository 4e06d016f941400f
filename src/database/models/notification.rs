use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::NotificationType;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub is_read: bool,
    pub related_id: Option<i64>,
    pub related_type: Option<String>,
    pub sent_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Everything needed to insert a notification row
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub notification_type: NotificationType,
    pub related_id: Option<i64>,
    pub related_type: Option<String>,
    pub sent_by: Option<i64>,
}

impl NewNotification {
    pub fn system(user_id: i64, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            message: message.into(),
            notification_type: NotificationType::System,
            related_id: None,
            related_type: None,
            sent_by: None,
        }
    }

    pub fn of_type(mut self, notification_type: NotificationType) -> Self {
        self.notification_type = notification_type;
        self
    }

    pub fn sent_by(mut self, sender: Option<i64>) -> Self {
        self.sent_by = sender;
        self
    }

    pub fn related(mut self, kind: &str, id: i64) -> Self {
        self.related_type = Some(kind.to_string());
        self.related_id = Some(id);
        self
    }
}

/// One broadcast as shown in the TPO history list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BroadcastGroup {
    pub title: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    pub recipient_count: i64,
}
