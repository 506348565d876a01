// handlers/data/create.rs - POST /api/<resource> handlers
//
// Request bodies use camelCase keys; each body maps its keys onto table
// columns and declares which ones are required.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::repository::FieldSet;
use crate::database::Resource;
use crate::error::ApiError;
use crate::handlers::extract::ApiJson;
use crate::AppState;

/// A create request for one resource.
pub trait CreateBody: DeserializeOwned + Send + 'static {
    const RESOURCE: Resource;

    fn into_fields(self) -> FieldSet;
}

/// POST /api/<resource> - Insert a row and return it with status 201
pub async fn create_post<B: CreateBody>(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<B>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let row = state.repository(B::RESOURCE).create(body.into_fields()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkspace {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub created_by: Option<Uuid>,
    pub plan_tier: Option<String>,
}

impl CreateBody for CreateWorkspace {
    const RESOURCE: Resource = Resource::Workspace;

    fn into_fields(self) -> FieldSet {
        FieldSet::new()
            .optional("id", self.id)
            .required("name", "name", self.name)
            .required("created_by", "created_by", self.created_by)
            .with_default("plan_tier", self.plan_tier, json!("free"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoard {
    pub name: Option<String>,
    pub workspace_id: Option<Uuid>,
    pub order_index: Option<i32>,
}

impl CreateBody for CreateBoard {
    const RESOURCE: Resource = Resource::Board;

    fn into_fields(self) -> FieldSet {
        FieldSet::new()
            .required("name", "name", self.name)
            .required("workspaceId", "workspace_id", self.workspace_id)
            .optional("order_index", self.order_index)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateList {
    pub name: Option<String>,
    pub board_id: Option<Uuid>,
    pub order_index: Option<i32>,
}

impl CreateBody for CreateList {
    const RESOURCE: Resource = Resource::List;

    fn into_fields(self) -> FieldSet {
        FieldSet::new()
            .required("name", "name", self.name)
            .required("boardId", "board_id", self.board_id)
            .optional("order_index", self.order_index)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub order_index: Option<i32>,
    pub board_id: Option<Uuid>,
    pub list_id: Option<Uuid>,
    pub workspace_id: Option<Uuid>,
    pub created_by_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
}

impl CreateBody for CreateTask {
    const RESOURCE: Resource = Resource::Task;

    fn into_fields(self) -> FieldSet {
        FieldSet::new()
            .required("title", "title", self.title)
            .with_default("description", self.description, json!(""))
            .optional("status", self.status)
            .optional("priority", self.priority)
            .optional("due_date", self.due_date)
            .optional("order_index", self.order_index)
            .required("boardId", "board_id", self.board_id)
            .required("listId", "list_id", self.list_id)
            .required("workspaceId", "workspace_id", self.workspace_id)
            .optional("created_by_id", self.created_by_id)
            .optional("assignee_id", self.assignee_id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    pub task_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub body: Option<String>,
}

impl CreateBody for CreateComment {
    const RESOURCE: Resource = Resource::Comment;

    fn into_fields(self) -> FieldSet {
        FieldSet::new()
            .required("taskId", "task_id", self.task_id)
            .required("authorId", "author_id", self.author_id)
            .required("body", "body", self.body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttachment {
    pub task_id: Option<Uuid>,
    pub file_name: Option<String>,
    pub url: Option<String>,
    pub size: Option<i64>,
    pub mime_type: Option<String>,
    pub uploaded_by_id: Option<Uuid>,
}

impl CreateBody for CreateAttachment {
    const RESOURCE: Resource = Resource::Attachment;

    fn into_fields(self) -> FieldSet {
        FieldSet::new()
            .required("taskId", "task_id", self.task_id)
            .required("fileName", "file_name", self.file_name)
            .required("url", "url", self.url)
            .required("size", "size", self.size)
            .required("mimeType", "mime_type", self.mime_type)
            .optional("uploaded_by_id", self.uploaded_by_id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotification {
    pub user_id: Option<Uuid>,
    pub kind: Option<String>,
    pub message: Option<String>,
    pub task_id: Option<Uuid>,
}

impl CreateBody for CreateNotification {
    const RESOURCE: Resource = Resource::Notification;

    fn into_fields(self) -> FieldSet {
        FieldSet::new()
            .required("userId", "user_id", self.user_id)
            .with_default("kind", self.kind, json!("info"))
            .required("message", "message", self.message)
            .optional("task_id", self.task_id)
    }
}
