use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::models::event::{EVENT_CANCELLED, EVENT_COMPLETED, EVENT_UPCOMING};
use crate::database::DatabaseError;
use crate::report::{placement_percentage, Analytics};
use crate::types::{file_type, UserRole};

/// One row of the admin user tables, with document flags folded in
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    #[sqlx(skip)]
    pub status: &'static str,
    #[serde(skip)]
    pub is_active: bool,
    pub is_approved: bool,
    pub profile_complete: bool,
    pub created_at: DateTime<Utc>,
    pub placement_status: Option<String>,
    pub approval_status: Option<String>,
    pub company_name: Option<String>,
    pub degree: Option<String>,
    pub year: Option<String>,
    pub skills: Option<String>,
    pub about: Option<String>,
    pub has_verified_resume: bool,
    pub has_verified_offer_letter: bool,
    pub resume_file_id: Option<i64>,
    pub offer_letter_file_id: Option<i64>,
}

const ACCOUNT_SELECT: &str = "SELECT u.id, TRIM(u.first_name || ' ' || u.last_name) AS name, u.email, u.phone_number, \
         u.role, u.is_active, u.is_approved, u.profile_complete, u.created_at, \
         p.placement_status, p.approval_status, p.company_name, p.degree, p.year, p.skills, p.about, \
         r.id IS NOT NULL AS has_verified_resume, o.id IS NOT NULL AS has_verified_offer_letter, \
         r.id AS resume_file_id, o.id AS offer_letter_file_id \
     FROM users u \
     LEFT JOIN profiles p ON p.user_id = u.id \
     LEFT JOIN LATERAL (SELECT id FROM file_uploads WHERE user_id = u.id AND file_type = $1 AND is_verified \
                        ORDER BY uploaded_at DESC, id DESC LIMIT 1) r ON TRUE \
     LEFT JOIN LATERAL (SELECT id FROM file_uploads WHERE user_id = u.id AND file_type = $2 \
                        ORDER BY uploaded_at DESC, id DESC LIMIT 1) o ON TRUE";

pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All accounts, or only those with `role`
    pub async fn accounts(&self, role: Option<UserRole>) -> Result<Vec<AccountRow>, DatabaseError> {
        let sql = format!(
            "{} WHERE ($3::TEXT IS NULL OR UPPER(u.role) = $3) ORDER BY u.id",
            ACCOUNT_SELECT
        );
        let mut rows: Vec<AccountRow> = sqlx::query_as(&sql)
            .bind(file_type::RESUME)
            .bind(file_type::OFFER_LETTER)
            .bind(role.map(|r| r.as_str()))
            .fetch_all(&self.pool)
            .await?;

        for row in &mut rows {
            row.status = if row.is_active { "Active" } else { "Inactive" };
        }
        Ok(rows)
    }

    pub async fn analytics(&self) -> Result<Analytics, DatabaseError> {
        #[derive(FromRow)]
        struct Totals {
            total_users: i64,
            active_users: i64,
            total_students: i64,
            total_tpos: i64,
            placed_students: i64,
            total_jobs: i64,
            active_jobs: i64,
            total_applications: i64,
            total_events: i64,
            upcoming_events: i64,
            completed_events: i64,
            cancelled_events: i64,
            total_registrations: i64,
        }

        let t: Totals = sqlx::query_as(
            "SELECT \
                 (SELECT COUNT(*) FROM users) AS total_users, \
                 (SELECT COUNT(*) FROM users WHERE is_active) AS active_users, \
                 (SELECT COUNT(*) FROM users WHERE UPPER(role) = 'STUDENT') AS total_students, \
                 (SELECT COUNT(*) FROM users WHERE UPPER(role) = 'TPO') AS total_tpos, \
                 (SELECT COUNT(*) FROM users u WHERE UPPER(u.role) = 'STUDENT' AND EXISTS \
                     (SELECT 1 FROM file_uploads f WHERE f.user_id = u.id AND f.file_type = $1)) AS placed_students, \
                 (SELECT COUNT(*) FROM jobs) AS total_jobs, \
                 (SELECT COUNT(*) FROM jobs WHERE is_active) AS active_jobs, \
                 (SELECT COUNT(*) FROM job_applications) AS total_applications, \
                 (SELECT COUNT(*) FROM events) AS total_events, \
                 (SELECT COUNT(*) FROM events WHERE status = $2) AS upcoming_events, \
                 (SELECT COUNT(*) FROM events WHERE status = $3) AS completed_events, \
                 (SELECT COUNT(*) FROM events WHERE status = $4) AS cancelled_events, \
                 (SELECT COUNT(*) FROM event_registrations) AS total_registrations",
        )
        .bind(file_type::OFFER_LETTER)
        .bind(EVENT_UPCOMING)
        .bind(EVENT_COMPLETED)
        .bind(EVENT_CANCELLED)
        .fetch_one(&self.pool)
        .await?;

        Ok(Analytics {
            total_users: t.total_users,
            total_students: t.total_students,
            total_tpos: t.total_tpos,
            placed_students: t.placed_students,
            unplaced_students: t.total_students - t.placed_students,
            active_jobs: t.active_jobs,
            inactive_jobs: t.total_jobs - t.active_jobs,
            total_applications: t.total_applications,
            total_events: t.total_events,
            upcoming_events: t.upcoming_events,
            completed_events: t.completed_events,
            cancelled_events: t.cancelled_events,
            total_registrations: t.total_registrations,
            placement_percentage: placement_percentage(t.placed_students, t.total_students),
            total_jobs: t.total_jobs,
            active_users: t.active_users,
            inactive_users: t.total_users - t.active_users,
        })
    }
}
