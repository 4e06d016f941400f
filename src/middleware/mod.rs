pub mod auth;
pub mod cors;
pub mod response;

pub use auth::{require_admin, require_staff, AuthUser};
pub use cors::cors_layer;
pub use response::{ApiResponse, ApiResult, Attachment};
