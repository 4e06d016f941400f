// handlers/public/notifications/mod.rs - /api/v1/notifications/*

pub mod notification;
pub mod send;

pub use notification::*;
pub use send::*;
