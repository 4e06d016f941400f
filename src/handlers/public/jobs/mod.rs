// handlers/public/jobs/mod.rs - /api/v1/jobs/*

pub mod application;
pub mod job;

pub use application::*;
pub use job::*;
