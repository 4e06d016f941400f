use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::job_status;

#[derive(Debug, Clone, FromRow)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: Option<String>,
    pub job_type: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Wire form of a job; `status` is always derived from `is_active`.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: Option<String>,
    pub job_type: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub status: &'static str,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        Self {
            status: job_status(job.is_active),
            id: job.id,
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.description,
            requirements: job.requirements,
            salary_range: job.salary_range,
            job_type: job.job_type,
            application_deadline: job.application_deadline,
            is_active: job.is_active,
            created_by: job.created_by,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: Option<String>,
    pub job_type: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobChanges {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub salary_range: Option<String>,
    pub job_type: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub status: Option<String>,
}

impl JobChanges {
    /// A `status` word takes precedence over an explicit `is_active`.
    pub fn resolved_is_active(&self) -> Option<bool> {
        match &self.status {
            Some(status) => Some(crate::types::status_means_active(status)),
            None => self.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobApplication {
    pub id: i64,
    pub job_id: i64,
    pub user_id: i64,
    pub resume_id: Option<i64>,
    pub cover_letter: Option<String>,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}

/// Application joined with the applicant, for TPO review screens
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicantView {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub resume_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_word_overrides_flag() {
        let changes = JobChanges {
            is_active: Some(true),
            status: Some("Closed".into()),
            ..Default::default()
        };
        assert_eq!(changes.resolved_is_active(), Some(false));
    }

    #[test]
    fn explicit_flag_used_without_status() {
        let changes = JobChanges {
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(changes.resolved_is_active(), Some(false));
        assert_eq!(JobChanges::default().resolved_is_active(), None);
    }

    #[test]
    fn view_derives_status() {
        let job = Job {
            id: 7,
            title: "Data Analyst".into(),
            company: "DataWiz".into(),
            location: "Remote".into(),
            description: "Analyze data trends".into(),
            requirements: "SQL".into(),
            salary_range: None,
            job_type: None,
            application_deadline: None,
            is_active: false,
            created_by: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        let view = JobView::from(job);
        assert_eq!(view.status, "Inactive");
        assert_eq!(serde_json::to_value(&view).unwrap()["status"], "Inactive");
    }
}
