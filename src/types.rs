/// Shared enums used across the codebase

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Account role. Stored upper-case; parsed leniently because legacy rows and
/// clients send "student", "Tpo", " admin " and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserRole {
    #[default]
    Student,
    Tpo,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Student, UserRole::Tpo, UserRole::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::Tpo => "TPO",
            UserRole::Admin => "ADMIN",
        }
    }

    /// Case-insensitive match; anything unrecognised is a student.
    pub fn normalize(value: &str) -> Self {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == upper)
            .unwrap_or(UserRole::Student)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(UserRole::normalize(&raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    JobAlert,
    ApplicationUpdate,
    InterviewScheduled,
    EventReminder,
    ProfileApproved,
    ProfileRejected,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::JobAlert => "JOB_ALERT",
            NotificationType::ApplicationUpdate => "APPLICATION_UPDATE",
            NotificationType::InterviewScheduled => "INTERVIEW_SCHEDULED",
            NotificationType::EventReminder => "EVENT_REMINDER",
            NotificationType::ProfileApproved => "PROFILE_APPROVED",
            NotificationType::ProfileRejected => "PROFILE_REJECTED",
            NotificationType::System => "SYSTEM",
        }
    }
}

impl Default for NotificationType {
    fn default() -> Self {
        NotificationType::System
    }
}

/// Review state of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Pending,
    Verified,
    Rejected,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Pending => "Pending",
            FileStatus::Verified => "Verified",
            FileStatus::Rejected => "Rejected",
        }
    }
}

/// Upload categories the placement workflow cares about
pub mod file_type {
    pub const RESUME: &str = "resume";
    pub const OFFER_LETTER: &str = "offer_letter";
    pub const CERTIFICATE: &str = "certificate";
}

/// Public job status derived from `is_active`
pub fn job_status(is_active: bool) -> &'static str {
    if is_active {
        "Active"
    } else {
        "Inactive"
    }
}

/// Status strings that mean a job is open for applications
pub fn status_means_active(status: &str) -> bool {
    matches!(status.trim().to_ascii_lowercase().as_str(), "active" | "open" | "running")
}
