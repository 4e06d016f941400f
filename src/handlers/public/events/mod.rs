// handlers/public/events/mod.rs - /api/v1/events/*

pub mod event;
pub mod registration;

pub use event::*;
pub use registration::*;
