// handlers/public/mod.rs - endpoints that never look at the session token

pub mod auth;
pub mod system;

pub use auth::{login, logout, register};
pub use system::{api_info, health, not_found};
