// handlers/public/users/mod.rs - /api/v1/users/*

pub mod account;
pub mod credentials;
pub mod lookup;
pub mod profile;

pub use account::*;
pub use credentials::*;
pub use lookup::*;
pub use profile::*;
