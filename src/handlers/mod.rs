// handlers/mod.rs - HTTP handlers
//
// Public: /api/health, /api/auth/register, /api/auth/login, /api/<resource>*
// Bearer token required: /api/auth/whoami

pub mod auth;
pub mod data;
pub mod extract;
pub mod health;

pub use health::health_get;
