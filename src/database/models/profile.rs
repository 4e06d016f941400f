use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const PLACEMENT_NOT_PLACED: &str = "Not Placed";
pub const APPROVAL_PENDING: &str = "Pending";
pub const APPROVAL_APPROVED: &str = "Approved";
pub const APPROVAL_REJECTED: &str = "Rejected";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub phone: Option<String>,
    pub degree: Option<String>,
    pub year: Option<String>,
    pub skills: Option<String>,
    pub about: Option<String>,
    pub profile_image_url: Option<String>,
    pub alternate_email: Option<String>,
    pub placement_status: String,
    pub approval_status: String,
    pub company_name: Option<String>,
    pub offer_letter_url: Option<String>,
    pub is_approved: bool,
    pub approval_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Editable profile fields; absent fields are left untouched on update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFields {
    pub phone: Option<String>,
    pub degree: Option<String>,
    pub year: Option<String>,
    pub skills: Option<String>,
    pub about: Option<String>,
    pub profile_image_url: Option<String>,
    pub alternate_email: Option<String>,
    pub placement_status: Option<String>,
    pub company_name: Option<String>,
    pub offer_letter_url: Option<String>,
}
