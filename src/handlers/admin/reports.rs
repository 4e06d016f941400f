// handlers/admin/reports.rs - analytics, exports and review queues

use axum::extract::State;
use chrono::Utc;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Attachment};
use crate::report::{export, pdf, text, Analytics};
use crate::services::{AdminService, FileService, PendingCertificate, UserService};
use crate::AppState;

/// GET /admin/export-users
pub async fn admin_export_users(State(state): State<AppState>) -> Result<Attachment, ApiError> {
    let users = UserService::new(state.db.clone()).list().await?;
    let body = export::users_csv(&users).map_err(|e| {
        tracing::error!("CSV export failed: {}", e);
        ApiError::internal_server_error("Failed to export users")
    })?;
    Ok(Attachment::new("users_export.csv", "text/csv", body))
}

/// GET /admin/pending-certificates
pub async fn admin_pending_certificates(State(state): State<AppState>) -> ApiResult<Vec<PendingCertificate>> {
    Ok(ApiResponse::success(FileService::new(state.db.clone()).pending_certificates().await?))
}

/// GET /admin/analytics
pub async fn admin_analytics(State(state): State<AppState>) -> ApiResult<Analytics> {
    Ok(ApiResponse::success(AdminService::new(state.db.clone()).analytics().await?))
}

/// GET /admin/analytics/report
pub async fn admin_analytics_report(State(state): State<AppState>) -> Result<Attachment, ApiError> {
    let analytics = AdminService::new(state.db.clone()).analytics().await?;
    Ok(Attachment::new(
        "admin-analytics-report.pdf",
        "application/pdf",
        pdf::render(&analytics, Utc::now()),
    ))
}

/// GET /admin/analytics/report-text
pub async fn admin_analytics_report_text(State(state): State<AppState>) -> Result<Attachment, ApiError> {
    let analytics = AdminService::new(state.db.clone()).analytics().await?;
    Ok(Attachment::new(
        "admin-analytics-report.txt",
        "text/plain; charset=utf-8",
        text::render(&analytics, Utc::now()).into_bytes(),
    ))
}
