// handlers/auth/whoami.rs - GET /api/auth/whoami handler

use axum::{response::Json, Extension};
use serde_json::{json, Value};

use crate::middleware::AuthUser;

/// GET /api/auth/whoami - Identity carried by the bearer token
pub async fn whoami_get(Extension(user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "id": user.user_id,
        "email": user.email,
    }))
}
