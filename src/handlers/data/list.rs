// handlers/data/list.rs - GET /api/<resource> handler

use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::query_builder::{ListQuery, SortDirection};
use crate::database::Resource;
use crate::error::ApiError;
use crate::handlers::extract::ApiQuery;
use crate::AppState;

/// Parent-id filters accepted on collection reads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub workspace_id: Option<Uuid>,
    pub board_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

/// GET /api/<resource> - Rows of one resource, filtered by parent id
pub async fn list_get(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
    resource: Resource,
) -> Result<Json<Vec<Value>>, ApiError> {
    let query = list_query(resource, &params)?;
    let rows = state.repository(resource).list(query).await?;
    Ok(Json(rows))
}

/// Filter and ordering rules per resource. Parameters that do not apply to
/// the resource are ignored.
pub fn list_query(resource: Resource, params: &ListParams) -> Result<ListQuery, ApiError> {
    let (filter, order) = match resource {
        Resource::Workspace => (None, None),
        Resource::Board => (
            Some(("workspace_id", require("workspaceId", params.workspace_id)?)),
            Some(("order_index", SortDirection::Asc)),
        ),
        Resource::List => (
            Some(("board_id", require("boardId", params.board_id)?)),
            Some(("order_index", SortDirection::Asc)),
        ),
        Resource::Task => (
            params.board_id.map(|id| ("board_id", id)),
            Some(("order_index", SortDirection::Asc)),
        ),
        Resource::Comment => (
            params.task_id.map(|id| ("task_id", id)),
            Some(("created_at", SortDirection::Asc)),
        ),
        Resource::Attachment => (
            Some(("task_id", require("taskId", params.task_id)?)),
            Some(("uploaded_at", SortDirection::Desc)),
        ),
        Resource::Notification => (
            Some(("user_id", require("userId", params.user_id)?)),
            Some(("created_at", SortDirection::Desc)),
        ),
    };

    let mut query = ListQuery::new(resource);
    if let Some((column, id)) = filter {
        query = query.filter_by(column, id).map_err(|err| {
            tracing::error!("List filter for {}: {}", resource.table(), err);
            ApiError::internal_server_error("Internal server error")
        })?;
    }
    if let Some((column, direction)) = order {
        query = query.order_by(column, direction);
    }

    Ok(query)
}

fn require(key: &str, value: Option<Uuid>) -> Result<Uuid, ApiError> {
    value.ok_or_else(|| ApiError::MissingFields(vec![key.to_string()]))
}
