pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod report;
pub mod services;
pub mod storage;
pub mod types;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put, MethodRouter},
    Router,
};
use sqlx::PgPool;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::mail::{build_mailer, MailError, Mailer};
use crate::storage::{Storage, StorageError};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub storage: Storage,
    pub mailer: Arc<dyn Mailer>,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Mail(#[from] MailError),
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Result<Self, StartupError> {
        let storage = Storage::from_config(&config.storage)?;
        let mailer: Arc<dyn Mailer> = Arc::from(build_mailer(&config.mail)?);

        Ok(Self {
            db,
            config: Arc::new(config),
            storage,
            mailer,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let cors = middleware::cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .nest("/api/v1", api_routes(&state))
        // Global middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(user_routes())
        .merge(job_routes())
        .merge(event_routes())
        .merge(file_routes())
        .merge(notification_routes())
        .merge(tpo_routes(state))
        .merge(admin_routes(state))
}

/// Collections answer with and without the trailing slash.
fn collection(router: Router<AppState>, path: &str, methods: MethodRouter<AppState>) -> Router<AppState> {
    router.route(path, methods.clone()).route(&format!("{}/", path), methods)
}

fn user_routes() -> Router<AppState> {
    use handlers::public::users;

    collection(Router::new(), "/users", post(users::user_create))
        .route("/users/register", post(users::user_register))
        .route("/users/login", post(users::user_login))
        .route("/users/forgot-password", post(users::forgot_password))
        .route("/users/reset-password", post(users::reset_password))
        .route("/users/by-email", get(users::user_by_email_query))
        .route("/users/by-email/:email", get(users::user_by_email))
        .route("/users/clerk/:clerk_user_id", get(users::user_by_clerk_id))
        .route(
            "/users/:id",
            get(users::user_get).put(users::user_update).delete(users::user_delete),
        )
        .route(
            "/users/:id/profile",
            get(users::profile_get)
                .post(users::profile_upsert)
                .put(users::profile_update),
        )
}

fn job_routes() -> Router<AppState> {
    use handlers::public::jobs;

    collection(Router::new(), "/jobs", get(jobs::job_list).post(jobs::job_create))
        .route(
            "/jobs/applications",
            get(jobs::application_list).post(jobs::application_create),
        )
        .route("/jobs/applications/user/:user_id", get(jobs::application_list_for_user))
        .route("/jobs/applications/:id", put(jobs::application_update))
        .route(
            "/jobs/:id",
            get(jobs::job_get).put(jobs::job_update).delete(jobs::job_delete),
        )
        .route("/jobs/:id/apply", post(jobs::job_apply))
}

fn event_routes() -> Router<AppState> {
    use handlers::public::events;

    collection(Router::new(), "/events", get(events::event_list).post(events::event_create))
        .route(
            "/events/:id",
            get(events::event_get).put(events::event_update).delete(events::event_delete),
        )
        .route("/events/:id/register", post(events::event_register))
        .route("/events/:id/registrations", get(events::event_registrations))
}

fn file_routes() -> Router<AppState> {
    use handlers::public::files;

    Router::new()
        .route("/files/upload", post(files::file_upload))
        .route("/files/upload-r2", post(files::file_upload))
        .route("/files/upload-r2-multipart", post(files::file_upload_multipart))
        .route("/files/by-user/:user_id", get(files::files_by_user))
        .route("/files/local/:name", get(files::file_local))
        .route("/files/:id", get(files::file_get))
        .route("/files/:id/presigned", get(files::file_presigned))
        .route("/files/:id/download", get(files::file_download))
        .route("/files/:id/verify", put(files::file_verify))
        .route("/files/:id/reject", put(files::file_reject))
}

fn notification_routes() -> Router<AppState> {
    use handlers::public::notifications;

    collection(
        Router::new(),
        "/notifications",
        get(notifications::notification_list).post(notifications::notification_create),
    )
    .route("/notifications/send", post(notifications::notification_send))
    .route("/notifications/user/:user_id", get(notifications::notification_list_for_user))
    .route(
        "/notifications/:id",
        get(notifications::notification_get)
            .put(notifications::notification_update)
            .delete(notifications::notification_delete),
    )
}

fn tpo_routes(state: &AppState) -> Router<AppState> {
    use handlers::public::{events, jobs};
    use handlers::tpo;

    Router::new()
        .route("/tpo/jobs", get(tpo::tpo_jobs).post(jobs::job_create))
        .route("/tpo/jobs/:id", put(jobs::job_update).delete(jobs::job_delete))
        .route("/tpo/jobs/:id/applications", get(tpo::tpo_job_applicants))
        .route("/tpo/events", get(tpo::tpo_events).post(events::event_create))
        .route("/tpo/events/:id", put(events::event_update).delete(events::event_delete))
        .route("/tpo/events/:id/registrations", get(tpo::tpo_event_registrants))
        .route("/tpo/:user_id/profile", get(tpo::tpo_profile))
        .route("/tpo/stats/summary", get(tpo::tpo_summary))
        .route("/tpo/pending-profiles", get(tpo::tpo_pending_profiles))
        .route("/tpo/approved-students", get(tpo::tpo_approved_students))
        .route("/tpo/pending-resumes", get(tpo::tpo_pending_resumes))
        .route("/tpo/verified-resumes", get(tpo::tpo_verified_resumes))
        .route("/tpo/notifications/broadcast", post(tpo::tpo_broadcast))
        .route("/tpo/notifications/history", get(tpo::tpo_broadcast_history))
        .route("/tpo/profiles/:user_id/approve", put(tpo::tpo_approve_profile))
        .route("/tpo/profiles/:user_id/reject", put(tpo::tpo_reject_profile))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_staff))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    use handlers::admin;

    Router::new()
        .route("/admin/users", get(admin::admin_users))
        .route("/admin/students", get(admin::admin_students))
        .route("/admin/tpos", get(admin::admin_tpos))
        .route("/admin/user/:id", get(admin::admin_user_detail))
        .route("/admin/user/:id/approve", put(admin::admin_approve_user))
        .route("/admin/user/:id/reject", put(admin::admin_reject_user))
        .route("/admin/user/:id/activate", put(admin::admin_activate_user))
        .route("/admin/user/:id/deactivate", put(admin::admin_deactivate_user))
        .route("/admin/create-user", post(admin::admin_create_user))
        .route("/admin/send-notification", post(admin::admin_send_notification))
        .route("/admin/export-users", get(admin::admin_export_users))
        .route("/admin/pending-certificates", get(admin::admin_pending_certificates))
        .route("/admin/analytics", get(admin::admin_analytics))
        .route("/admin/analytics/report", get(admin::admin_analytics_report))
        .route("/admin/analytics/report-text", get(admin::admin_analytics_report_text))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_admin))
}
