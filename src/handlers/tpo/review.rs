// handlers/tpo/review.rs - profile approval decisions

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::database::models::Profile;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ProfileService, ReviewDecision};
use crate::AppState;

use super::sender;

#[derive(Debug, Serialize)]
pub struct ReviewOutcome {
    pub id: i64,
    pub user_id: i64,
    pub is_approved: bool,
    pub approval_status: String,
}

impl From<Profile> for ReviewOutcome {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            is_approved: profile.is_approved,
            approval_status: profile.approval_status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApproveQuery {
    pub notes: Option<String>,
    pub sent_by: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RejectQuery {
    pub reason: Option<String>,
    pub sent_by: Option<i64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// PUT /tpo/profiles/:user_id/approve?notes=&sent_by=
pub async fn tpo_approve_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    caller: Option<Extension<AuthUser>>,
    Query(query): Query<ApproveQuery>,
) -> ApiResult<ReviewOutcome> {
    let decision = ReviewDecision::Approve {
        notes: non_empty(query.notes),
    };
    let profile = ProfileService::new(state.db.clone())
        .review(user_id, &decision, sender(query.sent_by, caller))
        .await?;
    tracing::info!("Profile of user {} approved", user_id);
    Ok(ApiResponse::success(profile.into()))
}

/// PUT /tpo/profiles/:user_id/reject?reason=&sent_by=
pub async fn tpo_reject_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    caller: Option<Extension<AuthUser>>,
    Query(query): Query<RejectQuery>,
) -> ApiResult<ReviewOutcome> {
    let decision = ReviewDecision::Reject {
        reason: non_empty(query.reason),
    };
    let profile = ProfileService::new(state.db.clone())
        .review(user_id, &decision, sender(query.sent_by, caller))
        .await?;
    tracing::info!("Profile of user {} rejected", user_id);
    Ok(ApiResponse::success(profile.into()))
}
