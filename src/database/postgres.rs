use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgArguments, PgPool, Postgres, Row};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{NewUser, User};
use crate::database::query_builder::{self, InsertOperation, ListQuery, SqlResult, UpdateOperation};
use crate::database::resource::Resource;
use crate::database::store::{RecordStore, UserStore};

/// PostgreSQL implementation of the store traits.
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseManager,
}

impl PgStore {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    fn pool(&self) -> &PgPool {
        self.db.pool()
    }

    async fn fetch_record(&self, sql: &SqlResult, source: &'static str) -> Result<Option<Value>, DatabaseError> {
        let row = bind_all(sqlx::query(&sql.query), &sql.params)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| record_column(&r, source)).transpose()
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert(&self, op: &InsertOperation) -> Result<Value, DatabaseError> {
        let table = op.resource.table();
        tracing::debug!(
            "Inserting into {}: columns={:?}",
            table,
            op.values.iter().map(|a| a.column.name).collect::<Vec<_>>()
        );

        self.fetch_record(&op.to_sql(), table)
            .await?
            .ok_or(DatabaseError::RowShape(table))
    }

    async fn fetch(&self, resource: Resource, id: Uuid) -> Result<Option<Value>, DatabaseError> {
        self.fetch_record(&query_builder::select_by_id(resource, id), resource.table())
            .await
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Value>, DatabaseError> {
        let sql = query.to_sql();
        let rows = bind_all(sqlx::query(&sql.query), &sql.params)
            .fetch_all(self.pool())
            .await?;

        rows.iter()
            .map(|r| record_column(r, query.resource.table()))
            .collect()
    }

    async fn update(&self, op: &UpdateOperation) -> Result<Option<Value>, DatabaseError> {
        tracing::debug!(
            "Updating record {} in {}: fields={:?}",
            op.target_id,
            op.table(),
            op.assignments.iter().map(|a| a.column.name).collect::<Vec<_>>()
        );

        self.fetch_record(&op.to_sql(), op.table()).await
    }

    async fn delete(&self, resource: Resource, id: Uuid) -> Result<bool, DatabaseError> {
        let sql = query_builder::delete_by_id(resource, id);
        let result = bind_all(sqlx::query(&sql.query), &sql.params)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &NewUser) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO users (id, name, email, password_hash) VALUES ($1, $2, $3, $4)")
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at
             FROM users
             WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }
}

fn record_column(row: &sqlx::postgres::PgRow, source: &'static str) -> Result<Value, DatabaseError> {
    match row.try_get::<Value, _>("record")? {
        v @ Value::Object(_) => Ok(v),
        _ => Err(DatabaseError::RowShape(source)),
    }
}

fn bind_all<'q>(
    mut q: sqlx::query::Query<'q, Postgres, PgArguments>,
    params: &'q [Value],
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    for p in params {
        q = bind_param(q, p);
    }
    q
}

/// Bind one JSON value. Every placeholder carries an explicit cast to its
/// column type, so scalars bind with their natural Postgres type and
/// composites as JSONB.
fn bind_param<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v),
    }
}
