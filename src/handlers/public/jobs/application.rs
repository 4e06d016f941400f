// handlers/public/jobs/application.rs - applying to jobs and tracking applications

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::database::models::JobApplication;
use crate::error::ApiError;
use crate::handlers::{required, PageQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ApplicationDraft, JobService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub user_id: i64,
    pub resume_id: Option<i64>,
    pub cover_letter: Option<String>,
}

/// POST /jobs/:id/apply
///
/// Without an explicit `resume_id` the applicant's best resume upload is attached.
pub async fn job_apply(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(body): Json<ApplyRequest>,
) -> ApiResult<JobApplication> {
    let jobs = JobService::new(state.db.clone());
    if !jobs.exists(job_id).await? {
        return Err(ApiError::not_found("Job not found"));
    }
    if jobs.has_applied(job_id, body.user_id).await? {
        return Err(ApiError::bad_request("Already applied to this job"));
    }

    let resume_id = match body.resume_id {
        Some(id) => Some(id),
        None => jobs.default_resume(body.user_id).await?,
    };

    let application = jobs
        .create_application(&ApplicationDraft {
            job_id,
            user_id: body.user_id,
            resume_id,
            cover_letter: body.cover_letter,
            status: None,
        })
        .await?;
    Ok(ApiResponse::created(application))
}

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_id: i64,
    pub user_id: i64,
    pub resume_id: Option<i64>,
    pub cover_letter: Option<String>,
    pub status: Option<String>,
}

/// POST /jobs/applications
pub async fn application_create(
    State(state): State<AppState>,
    Json(body): Json<CreateApplicationRequest>,
) -> ApiResult<JobApplication> {
    let jobs = JobService::new(state.db.clone());
    if !jobs.exists(body.job_id).await? {
        return Err(ApiError::not_found("Job not found"));
    }

    let application = jobs
        .create_application(&ApplicationDraft {
            job_id: body.job_id,
            user_id: body.user_id,
            resume_id: body.resume_id,
            cover_letter: body.cover_letter,
            status: body.status,
        })
        .await?;
    Ok(ApiResponse::created(application))
}

/// GET /jobs/applications
pub async fn application_list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Vec<JobApplication>> {
    let (skip, limit) = page.resolve(&state.config);
    Ok(ApiResponse::success(JobService::new(state.db.clone()).list_applications(skip, limit).await?))
}

/// GET /jobs/applications/user/:user_id
pub async fn application_list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Vec<JobApplication>> {
    let (skip, limit) = page.resolve(&state.config);
    let applications = JobService::new(state.db.clone())
        .applications_for_user(user_id, skip, limit)
        .await?;
    Ok(ApiResponse::success(applications))
}

#[derive(Debug, Deserialize)]
pub struct ApplicationStatusRequest {
    pub status: Option<String>,
}

/// PUT /jobs/applications/:id
pub async fn application_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ApplicationStatusRequest>,
) -> ApiResult<JobApplication> {
    let status = required("status", body.status.as_deref())?;
    let application = JobService::new(state.db.clone())
        .update_application_status(id, status)
        .await?;
    Ok(ApiResponse::success(application))
}
