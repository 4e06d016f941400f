use sqlx::PgPool;

use crate::database::models::{ApplicantView, Job, JobApplication, JobChanges, NewJob};
use crate::database::DatabaseError;
use crate::types::{file_type, FileStatus};

const JOB_COLUMNS: &str = "id, title, company, location, description, requirements, salary_range, job_type, \
     application_deadline, is_active, created_by, created_at, updated_at";
const APPLICATION_COLUMNS: &str = "id, job_id, user_id, resume_id, cover_letter, status, applied_at";

pub const APPLICATION_PENDING: &str = "PENDING";

/// Application insert; `resume_id` is resolved by the caller.
#[derive(Debug, Clone)]
pub struct ApplicationDraft {
    pub job_id: i64,
    pub user_id: i64,
    pub resume_id: Option<i64>,
    pub cover_letter: Option<String>,
    pub status: Option<String>,
}

/// Per-job application count for the TPO dashboard
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct JobApplicationCount {
    pub job_id: i64,
    pub title: String,
    pub count: i64,
}

pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, job: &NewJob) -> Result<Job, DatabaseError> {
        let sql = format!(
            "INSERT INTO jobs (title, company, location, description, requirements, salary_range, job_type, \
                 application_deadline, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            JOB_COLUMNS
        );
        let created: Job = sqlx::query_as(&sql)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.salary_range)
            .bind(&job.job_type)
            .bind(job.application_deadline)
            .bind(job.created_by)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!("Created job {} '{}' at {}", created.id, created.title, created.company);
        Ok(created)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Job>, DatabaseError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM jobs WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Job>, DatabaseError> {
        let sql = format!("SELECT {} FROM jobs ORDER BY id OFFSET $1 LIMIT $2", JOB_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(skip).bind(limit).fetch_all(&self.pool).await?)
    }

    /// Newest first, optionally only active (`Some(true)`) or inactive jobs.
    pub async fn list_recent(&self, active: Option<bool>, skip: i64, limit: i64) -> Result<Vec<Job>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM jobs WHERE ($1::BOOLEAN IS NULL OR is_active = $1) \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3",
            JOB_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(active)
            .bind(skip)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn update(&self, id: i64, changes: &JobChanges) -> Result<Job, DatabaseError> {
        let sql = format!(
            "UPDATE jobs SET \
                 title = COALESCE($2, title), \
                 company = COALESCE($3, company), \
                 location = COALESCE($4, location), \
                 description = COALESCE($5, description), \
                 requirements = COALESCE($6, requirements), \
                 salary_range = COALESCE($7, salary_range), \
                 job_type = COALESCE($8, job_type), \
                 application_deadline = COALESCE($9, application_deadline), \
                 is_active = COALESCE($10, is_active), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            JOB_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.company)
            .bind(&changes.location)
            .bind(&changes.description)
            .bind(&changes.requirements)
            .bind(&changes.salary_range)
            .bind(&changes.job_type)
            .bind(changes.application_deadline)
            .bind(changes.resolved_is_active())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Job not found".to_string()))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1").bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Job not found".to_string()));
        }
        tracing::info!("Deleted job {}", id);
        Ok(())
    }

    // Applications

    pub async fn has_applied(&self, job_id: i64, user_id: i64) -> Result<bool, DatabaseError> {
        let (applied,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM job_applications WHERE job_id = $1 AND user_id = $2)")
                .bind(job_id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(applied)
    }

    /// Latest verified resume, else latest resume of any status.
    pub async fn default_resume(&self, user_id: i64) -> Result<Option<i64>, DatabaseError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM file_uploads WHERE user_id = $1 AND file_type = $2 \
             ORDER BY (status = $3) DESC, uploaded_at DESC, id DESC LIMIT 1",
        )
        .bind(user_id)
        .bind(file_type::RESUME)
        .bind(FileStatus::Verified.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id,)| id))
    }

    pub async fn create_application(&self, draft: &ApplicationDraft) -> Result<JobApplication, DatabaseError> {
        let sql = format!(
            "INSERT INTO job_applications (job_id, user_id, resume_id, cover_letter, status) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 'PENDING')) RETURNING {}",
            APPLICATION_COLUMNS
        );
        let application: JobApplication = sqlx::query_as(&sql)
            .bind(draft.job_id)
            .bind(draft.user_id)
            .bind(draft.resume_id)
            .bind(&draft.cover_letter)
            .bind(&draft.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match DatabaseError::from(e) {
                DatabaseError::Conflict(_) => DatabaseError::Conflict("Already applied to this job".to_string()),
                other => other,
            })?;
        tracing::info!("User {} applied to job {}", draft.user_id, draft.job_id);
        Ok(application)
    }

    pub async fn list_applications(&self, skip: i64, limit: i64) -> Result<Vec<JobApplication>, DatabaseError> {
        let sql = format!("SELECT {} FROM job_applications ORDER BY id OFFSET $1 LIMIT $2", APPLICATION_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(skip).bind(limit).fetch_all(&self.pool).await?)
    }

    pub async fn applications_for_user(
        &self,
        user_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<JobApplication>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM job_applications WHERE user_id = $1 ORDER BY id OFFSET $2 LIMIT $3",
            APPLICATION_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(user_id)
            .bind(skip)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn update_application_status(&self, id: i64, status: &str) -> Result<JobApplication, DatabaseError> {
        let sql = format!("UPDATE job_applications SET status = $2 WHERE id = $1 RETURNING {}", APPLICATION_COLUMNS);
        sqlx::query_as(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Application not found".to_string()))
    }

    pub async fn applicants(&self, job_id: i64) -> Result<Vec<ApplicantView>, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT a.id, u.id AS user_id, TRIM(u.first_name || ' ' || u.last_name) AS name, u.email, \
                 a.status, a.applied_at, a.resume_id \
             FROM job_applications a JOIN users u ON u.id = a.user_id \
             WHERE a.job_id = $1 ORDER BY a.applied_at, a.id",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn application_counts(&self) -> Result<Vec<JobApplicationCount>, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT j.id AS job_id, j.title, COUNT(a.id) AS count \
             FROM jobs j LEFT JOIN job_applications a ON a.job_id = j.id \
             GROUP BY j.id, j.title ORDER BY count DESC, j.id",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
