// handlers/auth/register.rs - POST /api/auth/register handler

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;

use crate::database::models::UserSummary;
use crate::error::ApiError;
use crate::handlers::extract::ApiJson;
use crate::AppState;

// No Debug: the password must not end up in logs.
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// POST /api/auth/register - Create a user account
///
/// Responds 201 with `{id, email, name}`. Absent or blank fields are listed
/// in a MISSING_FIELDS error; a taken email is a 409.
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    let user = state.credentials.register(&req.email, &req.password, &req.name).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
