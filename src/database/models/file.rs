use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FileUpload {
    pub id: i64,
    pub user_id: i64,
    pub file_name: String,
    /// Object key for cloud uploads, filesystem path for local ones
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub file_type: String,
    pub file_url: Option<String>,
    pub file_hash: Option<String>,
    pub is_verified: bool,
    pub verified_by: Option<i64>,
    pub verification_notes: Option<String>,
    pub status: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFileUpload {
    pub user_id: i64,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub file_type: String,
    pub file_url: String,
    pub file_hash: String,
}

/// Upload joined with its owner, for review queues
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewItem {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub file_name: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub status: String,
    pub file_url: Option<String>,
}
