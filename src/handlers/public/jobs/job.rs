// handlers/public/jobs/job.rs - job postings CRUD
//
// Every response carries the derived `status` ("Active" / "Inactive").

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::{JobChanges, JobView, NewJob};
use crate::error::ApiError;
use crate::handlers::{required, PageQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::JobService;
use crate::AppState;

/// POST /jobs
pub async fn job_create(State(state): State<AppState>, Json(job): Json<NewJob>) -> ApiResult<JobView> {
    required("title", Some(job.title.as_str()))?;
    required("company", Some(job.company.as_str()))?;
    let created = JobService::new(state.db.clone()).create(&job).await?;
    Ok(ApiResponse::created(created.into()))
}

/// GET /jobs
pub async fn job_list(State(state): State<AppState>, Query(page): Query<PageQuery>) -> ApiResult<Vec<JobView>> {
    let (skip, limit) = page.resolve(&state.config);
    let jobs = JobService::new(state.db.clone()).list(skip, limit).await?;
    Ok(ApiResponse::success(jobs.into_iter().map(JobView::from).collect()))
}

/// GET /jobs/:id
pub async fn job_get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<JobView> {
    let job = JobService::new(state.db.clone())
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;
    Ok(ApiResponse::success(job.into()))
}

/// PUT /jobs/:id
pub async fn job_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<JobChanges>,
) -> ApiResult<JobView> {
    let job = JobService::new(state.db.clone()).update(id, &changes).await?;
    Ok(ApiResponse::success(job.into()))
}

/// DELETE /jobs/:id
pub async fn job_delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    JobService::new(state.db.clone()).delete(id).await?;
    Ok(ApiResponse::success(json!({ "message": "Job deleted successfully" })))
}
