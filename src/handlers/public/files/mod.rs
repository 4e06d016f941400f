// handlers/public/files/mod.rs - /api/v1/files/*

pub mod download;
pub mod record;
pub mod review;
pub mod upload;

pub use download::*;
pub use record::*;
pub use review::*;
pub use upload::*;
