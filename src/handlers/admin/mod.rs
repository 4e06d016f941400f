// handlers/admin/mod.rs - Administrator handlers
//
// Route Prefix: /api/v1/admin/*
// Middleware: middleware::auth::require_admin (ADMIN when auth is enforced)

pub mod accounts;
pub mod messaging;
pub mod reports;

pub use accounts::*;
pub use messaging::*;
pub use reports::*;
