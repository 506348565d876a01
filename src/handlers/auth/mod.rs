// handlers/auth/mod.rs - Auth handler module

pub mod login; // POST /api/auth/login
pub mod register; // POST /api/auth/register
pub mod whoami; // GET /api/auth/whoami

pub use login::login_post;
pub use register::register_post;
pub use whoami::whoami_get;
