// handlers/data/record.rs - GET/PATCH/DELETE /api/<resource>/:id handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::database::Resource;
use crate::error::ApiError;
use crate::handlers::extract::{ApiPath, PatchBody};
use crate::AppState;

/// GET /api/<resource>/:id - Get a single row by id
pub async fn record_get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    resource: Resource,
) -> Result<Json<Value>, ApiError> {
    let row = state.repository(resource).get(id).await?;
    Ok(Json(row))
}

/// PATCH /api/<resource>/:id - Update only the named fields
///
/// Responds with the complete row as stored after the update.
pub async fn record_patch(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    PatchBody(fields): PatchBody,
    resource: Resource,
) -> Result<Json<Value>, ApiError> {
    let row = state.repository(resource).update(id, fields).await?;
    Ok(Json(row))
}

/// DELETE /api/<resource>/:id - Remove a row, 204 on success
pub async fn record_delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    resource: Resource,
) -> Result<StatusCode, ApiError> {
    state.repository(resource).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/notifications/:id/read - Mark a notification read
pub async fn notification_read_patch(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let row = state.repository(Resource::Notification).mark_read(id).await?;
    Ok(Json(row))
}
