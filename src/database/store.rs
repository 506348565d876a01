//! Persistence seams consumed by the repositories and the credential store.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User};
use crate::database::query_builder::{InsertOperation, ListQuery, UpdateOperation};
use crate::database::resource::Resource;

/// Executes single-statement operations against resource tables.
///
/// Rows come back as JSON objects keyed by column name.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, op: &InsertOperation) -> Result<Value, DatabaseError>;

    async fn fetch(&self, resource: Resource, id: Uuid) -> Result<Option<Value>, DatabaseError>;

    async fn list(&self, query: &ListQuery) -> Result<Vec<Value>, DatabaseError>;

    /// Returns the post-update row, or `None` if no row has the target id.
    async fn update(&self, op: &UpdateOperation) -> Result<Option<Value>, DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete(&self, resource: Resource, id: Uuid) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// User-record persistence for the credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DatabaseError::Conflict` when the email is taken.
    async fn insert_user(&self, user: &NewUser) -> Result<(), DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
}
