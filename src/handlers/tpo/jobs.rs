// handlers/tpo/jobs.rs - GET /tpo/jobs and applicants per job

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::database::models::{ApplicantView, JobView};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::JobService;
use crate::types::status_means_active;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TpoJobsQuery {
    pub status: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /tpo/jobs?status=Active|Inactive - newest first
pub async fn tpo_jobs(State(state): State<AppState>, Query(query): Query<TpoJobsQuery>) -> ApiResult<Vec<JobView>> {
    let (skip, limit) = state.config.page(query.skip, query.limit);
    let active = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(status_means_active);

    let jobs = JobService::new(state.db.clone()).list_recent(active, skip, limit).await?;
    Ok(ApiResponse::success(jobs.into_iter().map(JobView::from).collect()))
}

/// GET /tpo/jobs/:id/applications - with applicant name and email
pub async fn tpo_job_applicants(State(state): State<AppState>, Path(job_id): Path<i64>) -> ApiResult<Vec<ApplicantView>> {
    let jobs = JobService::new(state.db.clone());
    if !jobs.exists(job_id).await? {
        return Err(ApiError::not_found("Job not found"));
    }
    Ok(ApiResponse::success(jobs.applicants(job_id).await?))
}
