// handlers/auth/login.rs - POST /api/auth/login handler

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::database::models::UserSummary;
use crate::error::ApiError;
use crate::handlers::extract::ApiJson;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// POST /api/auth/login - Exchange credentials for a one-hour bearer token
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state.credentials.authenticate(&req.email, &req.password).await?;
    let token = state.tokens.issue(user.id, &user.email)?;

    tracing::info!("Issued token for user {}", user.id);
    Ok(Json(LoginResponse { token, user }))
}
