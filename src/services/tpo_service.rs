use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;
use crate::types::file_type;

use super::job_service::JobApplicationCount;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_jobs: i64,
    pub total_applications: i64,
    pub total_selected: i64,
    pub total_students: i64,
    pub total_placed: i64,
    pub applications_by_job: Vec<JobApplicationCount>,
}

/// Student awaiting approval; profile columns read "N/A" when there is no profile.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PendingStudent {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub degree: String,
    pub year: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApprovedStudent {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub degree: String,
    pub year: String,
    pub skills: String,
    pub about: String,
    pub placement_status: String,
    pub company_name: String,
    pub resume_id: Option<i64>,
    pub offer_letter_url: String,
    pub offer_letter_id: Option<i64>,
}

pub struct TpoService {
    pool: PgPool,
}

impl TpoService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn summary(&self, applications_by_job: Vec<JobApplicationCount>) -> Result<DashboardSummary, DatabaseError> {
        let (total_jobs, total_applications, total_students, total_placed): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT \
                 (SELECT COUNT(*) FROM jobs), \
                 (SELECT COUNT(*) FROM job_applications), \
                 (SELECT COUNT(*) FROM users WHERE UPPER(role) = 'STUDENT'), \
                 (SELECT COUNT(*) FROM profiles WHERE placement_status = 'Placed')",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardSummary {
            total_jobs,
            total_applications,
            // Selection isn't tracked separately from placement
            total_selected: total_placed,
            total_students,
            total_placed,
            applications_by_job,
        })
    }

    pub async fn pending_students(&self) -> Result<Vec<PendingStudent>, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT u.id AS user_id, u.first_name, u.last_name, u.email, \
                 COALESCE(p.degree, 'N/A') AS degree, COALESCE(p.year, 'N/A') AS year \
             FROM users u LEFT JOIN profiles p ON p.user_id = u.id \
             WHERE UPPER(u.role) = 'STUDENT' AND NOT u.is_approved ORDER BY u.id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Approved students that have a profile, with their verified documents.
    pub async fn approved_students(&self) -> Result<Vec<ApprovedStudent>, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT u.id AS user_id, u.first_name, u.last_name, u.email, u.phone_number AS phone, \
                 COALESCE(p.degree, '') AS degree, COALESCE(p.year, '') AS year, \
                 COALESCE(p.skills, '') AS skills, COALESCE(p.about, '') AS about, \
                 p.placement_status, COALESCE(p.company_name, '') AS company_name, \
                 (SELECT id FROM file_uploads WHERE user_id = u.id AND file_type = $1 AND is_verified \
                  ORDER BY uploaded_at DESC, id DESC LIMIT 1) AS resume_id, \
                 COALESCE(p.offer_letter_url, '') AS offer_letter_url, \
                 (SELECT id FROM file_uploads WHERE user_id = u.id AND file_type = $2 AND is_verified \
                  ORDER BY uploaded_at DESC, id DESC LIMIT 1) AS offer_letter_id \
             FROM users u JOIN profiles p ON p.user_id = u.id \
             WHERE UPPER(u.role) = 'STUDENT' AND u.is_approved ORDER BY u.id",
        )
        .bind(file_type::RESUME)
        .bind(file_type::OFFER_LETTER)
        .fetch_all(&self.pool)
        .await?)
    }
}
