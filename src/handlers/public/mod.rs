// handlers/public/mod.rs - Handlers with no role requirement
//
// Route Prefix: /api/v1 (users, jobs, events, files, notifications)
// Middleware: none beyond the global CORS / trace / body-limit layers

pub mod events;
pub mod files;
pub mod jobs;
pub mod notifications;
pub mod users;
