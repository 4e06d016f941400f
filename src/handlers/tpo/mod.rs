// handlers/tpo/mod.rs - Placement-officer handlers
//
// Route Prefix: /api/v1/tpo/*
// Middleware: middleware::auth::require_staff (TPO or ADMIN when auth is enforced)
//
// Job and event writes reuse the public handlers; only the views differ.

pub mod broadcast;
pub mod dashboard;
pub mod events;
pub mod jobs;
pub mod review;

pub use broadcast::*;
pub use dashboard::*;
pub use events::*;
pub use jobs::*;
pub use review::*;

use axum::Extension;

use crate::middleware::AuthUser;

/// Explicit sender id, else the authenticated caller when there is one.
pub(crate) fn sender(explicit: Option<i64>, caller: Option<Extension<AuthUser>>) -> Option<i64> {
    explicit.or(caller.map(|Extension(user)| user.user_id))
}
