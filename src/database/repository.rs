use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::{InsertOperation, ListQuery, PartialUpdateBuilder, UpdateError};
use crate::database::resource::Resource;
use crate::database::store::RecordStore;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Create/read/update/delete for one resource table.
///
/// Reads, inserts and deletes bind their parameters directly; updates go
/// through [`PartialUpdateBuilder`] so the client's field map is checked
/// against the resource's allow-list first.
#[derive(Clone)]
pub struct ResourceRepository {
    resource: Resource,
    store: Arc<dyn RecordStore>,
}

impl ResourceRepository {
    pub fn new(resource: Resource, store: Arc<dyn RecordStore>) -> Self {
        Self { resource, store }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Insert a row. A fresh id is generated unless `fields` carries one.
    pub async fn create(&self, fields: FieldSet) -> Result<Value, ResourceError> {
        let mut values = fields.finish()?;
        if !values.iter().any(|(name, _)| *name == "id") {
            values.insert(0, ("id", Value::String(Uuid::new_v4().to_string())));
        }

        let op = InsertOperation::new(self.resource, values)?;
        let row = self.store.insert(&op).await?;
        tracing::info!("Created {} {}", self.resource.table(), row_id(&row));
        Ok(row)
    }

    pub async fn get(&self, id: Uuid) -> Result<Value, ResourceError> {
        self.store
            .fetch(self.resource, id)
            .await?
            .ok_or(ResourceError::NotFound(self.resource.label()))
    }

    pub async fn list(&self, query: ListQuery) -> Result<Vec<Value>, ResourceError> {
        debug_assert_eq!(query.resource, self.resource);
        Ok(self.store.list(&query).await?)
    }

    /// Apply a partial update and return the full post-update row.
    pub async fn update(&self, id: Uuid, fields: Map<String, Value>) -> Result<Value, ResourceError> {
        let op = PartialUpdateBuilder::new(self.resource).build(id, fields)?;
        let row = self
            .store
            .update(&op)
            .await?
            .ok_or(ResourceError::NotFound(self.resource.label()))?;
        tracing::info!("Updated {} {} ({} fields)", self.resource.table(), id, op.assignments.len());
        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ResourceError> {
        if !self.store.delete(self.resource, id).await? {
            return Err(ResourceError::NotFound(self.resource.label()));
        }
        tracing::info!("Deleted {} {}", self.resource.table(), id);
        Ok(())
    }

    /// Stamp `read_at` with the current time.
    pub async fn mark_read(&self, id: Uuid) -> Result<Value, ResourceError> {
        let mut fields = Map::new();
        fields.insert("read_at".to_string(), Value::String(Utc::now().to_rfc3339()));
        self.update(id, fields).await
    }
}

fn row_id(row: &Value) -> &str {
    row.get("id").and_then(Value::as_str).unwrap_or("<unknown>")
}

/// Column values for an insert, collected from a request body.
///
/// Required inputs that are absent, `null` or blank are remembered under the
/// key the client used, and reported together by [`FieldSet::finish`].
#[derive(Debug, Default)]
pub struct FieldSet {
    values: Vec<(&'static str, Value)>,
    missing: Vec<String>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required<T: Serialize>(mut self, key: &str, column: &'static str, value: Option<T>) -> Self {
        match value.map(to_value).filter(is_present) {
            Some(v) => self.values.push((column, v)),
            None => self.missing.push(key.to_string()),
        }
        self
    }

    pub fn optional<T: Serialize>(mut self, column: &'static str, value: Option<T>) -> Self {
        if let Some(v) = value.map(to_value).filter(is_present) {
            self.values.push((column, v));
        }
        self
    }

    /// Like `optional`, but writes `default` when the input is absent. The
    /// default is written as given, even when it is blank.
    pub fn with_default<T: Serialize>(mut self, column: &'static str, value: Option<T>, default: Value) -> Self {
        let value = value.map(to_value).filter(is_present).unwrap_or(default);
        self.values.push((column, value));
        self
    }

    pub fn finish(self) -> Result<Vec<(&'static str, Value)>, ResourceError> {
        if !self.missing.is_empty() {
            return Err(ResourceError::MissingFields(self.missing));
        }
        Ok(self.values)
    }
}

fn to_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}
