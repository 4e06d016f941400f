// handlers/system.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "PrepSphere API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Placement management backend for students, TPOs and admins",
            "endpoints": {
                "health": "/health (public)",
                "users": "/api/v1/users/*",
                "jobs": "/api/v1/jobs/*",
                "events": "/api/v1/events/*",
                "files": "/api/v1/files/*",
                "notifications": "/api/v1/notifications/*",
                "tpo": "/api/v1/tpo/* (TPO or ADMIN when auth is enforced)",
                "admin": "/api/v1/admin/* (ADMIN when auth is enforced)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
