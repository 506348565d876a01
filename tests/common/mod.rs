#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Map, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use taskboard_api::{
    app,
    auth::TokenIssuer,
    config::PasswordConfig,
    database::{
        models::{NewUser, User},
        query_builder::{self, InsertOperation, ListQuery, SortDirection, SqlResult, UpdateOperation},
        DatabaseError, RecordStore, Resource, UserStore,
    },
    services::CredentialStore,
    AppState,
};

pub const JWT_SECRET: &str = "integration-test-secret";

/// Stand-in for PostgreSQL. Rows are JSON objects; every statement a store
/// method would have run is rendered and kept in `statements`.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<Resource, Vec<Map<String, Value>>>>,
    users: Mutex<Vec<User>>,
    inserts: Mutex<Vec<InsertOperation>>,
    pub statements: Mutex<Vec<SqlResult>>,
}

impl MemoryStore {
    pub fn rows(&self, resource: Resource) -> Vec<Map<String, Value>> {
        self.tables.lock().unwrap().get(&resource).cloned().unwrap_or_default()
    }

    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    /// Column values of the most recent insert into `resource`, as sent by
    /// the application (before any column defaults).
    pub fn last_insert(&self, resource: Resource) -> Vec<(&'static str, Value)> {
        self.inserts
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|op| op.resource == resource)
            .map(|op| op.values.iter().map(|a| (a.column.name, a.value.clone())).collect())
            .unwrap_or_default()
    }

    fn record(&self, sql: SqlResult) {
        self.statements.lock().unwrap().push(sql);
    }
}

fn timestamp_column(resource: Resource) -> &'static str {
    match resource {
        Resource::Attachment => "uploaded_at",
        _ => "created_at",
    }
}

/// Column defaults from `sql/schema.sql`.
fn column_default(resource: Resource, column: &str) -> Value {
    match (resource, column) {
        (Resource::Workspace, "plan_tier") => json!("free"),
        (Resource::Board | Resource::List | Resource::Task, "order_index") => json!(0),
        (Resource::Task, "description") => json!(""),
        (Resource::Task, "status") => json!("todo"),
        (Resource::Task, "priority") => json!("medium"),
        (Resource::Notification, "kind") => json!("info"),
        _ => Value::Null,
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            x.as_f64().unwrap_or(0.0).partial_cmp(&y.as_f64().unwrap_or(0.0)).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, op: &InsertOperation) -> Result<Value, DatabaseError> {
        self.record(op.to_sql());
        self.inserts.lock().unwrap().push(op.clone());

        let mut row = Map::new();
        for column in op.resource.updatable_columns() {
            row.insert(column.name.to_string(), column_default(op.resource, column.name));
        }
        for assignment in &op.values {
            row.insert(assignment.column.name.to_string(), assignment.value.clone());
        }
        row.insert(
            timestamp_column(op.resource).to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );

        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(op.resource).or_default();
        if table.iter().any(|r| r.get("id") == row.get("id")) {
            return Err(DatabaseError::Conflict(format!("{}_pkey", op.resource.table())));
        }
        table.push(row.clone());
        Ok(Value::Object(row))
    }

    async fn fetch(&self, resource: Resource, id: Uuid) -> Result<Option<Value>, DatabaseError> {
        self.record(query_builder::select_by_id(resource, id));

        let id = Value::String(id.to_string());
        Ok(self
            .rows(resource)
            .into_iter()
            .find(|r| r.get("id") == Some(&id))
            .map(Value::Object))
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Value>, DatabaseError> {
        self.record(query.to_sql());

        let mut rows = self.rows(query.resource);
        if let Some((column, id)) = &query.filter {
            let id = Value::String(id.to_string());
            rows.retain(|r| r.get(column.name) == Some(&id));
        }
        if let Some((column, direction)) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare(
                    a.get(*column).unwrap_or(&Value::Null),
                    b.get(*column).unwrap_or(&Value::Null),
                );
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        Ok(rows.into_iter().map(Value::Object).collect())
    }

    async fn update(&self, op: &UpdateOperation) -> Result<Option<Value>, DatabaseError> {
        self.record(op.to_sql());

        let id = Value::String(op.target_id.to_string());
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .get_mut(&op.resource)
            .and_then(|rows| rows.iter_mut().find(|r| r.get("id") == Some(&id)));

        Ok(row.map(|row| {
            for assignment in &op.assignments {
                row.insert(assignment.column.name.to_string(), assignment.value.clone());
            }
            Value::Object(row.clone())
        }))
    }

    async fn delete(&self, resource: Resource, id: Uuid) -> Result<bool, DatabaseError> {
        self.record(query_builder::delete_by_id(resource, id));

        let id = Value::String(id.to_string());
        let mut tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get_mut(&resource) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|r| r.get("id") != Some(&id));
        Ok(rows.len() < before)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &NewUser) -> Result<(), DatabaseError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict("users_email_key".to_string()));
        }
        users.push(User {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

/// Full router over a fresh in-memory store, with cheap password hashing.
pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let password = PasswordConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    };

    let credentials = CredentialStore::new(store.clone(), &password).expect("credential store");
    let tokens = TokenIssuer::new(JWT_SECRET).expect("token issuer");
    let state = AppState::new(store.clone(), credentials, tokens);

    TestApp {
        router: app(state, CorsLayer::permissive()),
        store,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, Some(body), None).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PATCH, uri, Some(body), None).await
    }

    /// Sends `body` as-is with a JSON content type.
    pub async fn post_raw(&self, uri: &str, body: &'static str) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, uri, None, None).await
    }

    /// Creates workspace, board and list; returns their ids.
    pub async fn seed_board(&self) -> Result<(String, String, String)> {
        let owner = Uuid::new_v4();
        let (_, workspace) = self
            .post("/api/workspaces", serde_json::json!({ "name": "Acme", "created_by": owner }))
            .await?;
        let workspace_id = id_of(&workspace);

        let (_, board) = self
            .post("/api/boards", serde_json::json!({ "name": "Roadmap", "workspaceId": workspace_id }))
            .await?;
        let board_id = id_of(&board);

        let (_, list) = self
            .post("/api/lists", serde_json::json!({ "name": "Todo", "boardId": board_id }))
            .await?;
        let list_id = id_of(&list);

        Ok((workspace_id, board_id, list_id))
    }
}

pub fn id_of(row: &Value) -> String {
    row["id"].as_str().expect("row has an id").to_string()
}
