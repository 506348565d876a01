//! Statement descriptions for resource tables.
//!
//! Everything here is a pure transformation: callers hand the resulting
//! operation to a store, which decides how to execute it. Rendered SQL only
//! ever contains quoted identifiers taken from the resource allow-list,
//! positional placeholders, and casts to fixed SQL types. Values travel in
//! `SqlResult::params`.

use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::quote_identifier;
use crate::database::resource::{Column, Resource, ID_COLUMN};

#[derive(Debug, Error, PartialEq)]
pub enum UpdateError {
    #[error("No updates provided")]
    EmptyUpdate,

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Rendered command text plus its positional parameters (`$1` is `params[0]`).
#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: &'static Column,
    pub value: Value,
}

/// A targeted single-row update, ready for a store to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOperation {
    pub resource: Resource,
    pub target_id: Uuid,
    pub assignments: Vec<Assignment>,
}

impl UpdateOperation {
    pub fn table(&self) -> &'static str {
        self.resource.table()
    }

    /// `UPDATE .. SET "col" = $2::type, .. WHERE "id" = $1::uuid`, returning
    /// the updated row as a single JSON column named `record`.
    pub fn to_sql(&self) -> SqlResult {
        let mut params = Vec::with_capacity(self.assignments.len() + 1);
        params.push(Value::String(self.target_id.to_string()));

        let set_clauses: Vec<String> = self
            .assignments
            .iter()
            .enumerate()
            .map(|(i, assignment)| {
                params.push(assignment.value.clone());
                placeholder(assignment.column, i + 2)
            })
            .collect();

        let query = format!(
            "WITH r AS (UPDATE {} SET {} WHERE {} RETURNING *) SELECT row_to_json(r) AS record FROM r",
            quote_identifier(self.table()),
            set_clauses.join(", "),
            placeholder(&ID_COLUMN, 1),
        );

        SqlResult { query, params }
    }
}

/// Turns a client-supplied field map into an [`UpdateOperation`].
///
/// The table is fixed by the resource the builder was created for; only
/// column names from that resource's allow-list are accepted.
#[derive(Debug, Clone, Copy)]
pub struct PartialUpdateBuilder {
    resource: Resource,
}

impl PartialUpdateBuilder {
    pub fn new(resource: Resource) -> Self {
        Self { resource }
    }

    pub fn build(&self, target_id: Uuid, fields: Map<String, Value>) -> Result<UpdateOperation, UpdateError> {
        if fields.is_empty() {
            return Err(UpdateError::EmptyUpdate);
        }

        let mut assignments = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            let column = self
                .resource
                .updatable_column(&name)
                .ok_or(UpdateError::UnknownField(name))?;
            assignments.push(Assignment { column, value });
        }

        Ok(UpdateOperation {
            resource: self.resource,
            target_id,
            assignments,
        })
    }
}

/// A single-row insert with server-chosen columns.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOperation {
    pub resource: Resource,
    pub values: Vec<Assignment>,
}

impl InsertOperation {
    pub fn new(resource: Resource, values: Vec<(&str, Value)>) -> Result<Self, UpdateError> {
        let values = values
            .into_iter()
            .map(|(name, value)| {
                resource
                    .insertable_column(name)
                    .map(|column| Assignment { column, value })
                    .ok_or_else(|| UpdateError::UnknownField(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { resource, values })
    }

    pub fn to_sql(&self) -> SqlResult {
        let columns: Vec<String> = self.values.iter().map(|a| quote_identifier(a.column.name)).collect();
        let placeholders: Vec<String> = self
            .values
            .iter()
            .enumerate()
            .map(|(i, a)| param(a.column, i + 1))
            .collect();

        let query = format!(
            "WITH r AS (INSERT INTO {} ({}) VALUES ({}) RETURNING *) SELECT row_to_json(r) AS record FROM r",
            quote_identifier(self.resource.table()),
            columns.join(", "),
            placeholders.join(", "),
        );

        SqlResult {
            query,
            params: self.values.iter().map(|a| a.value.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Collection read with an optional equality filter on one foreign key.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub resource: Resource,
    pub filter: Option<(&'static Column, Uuid)>,
    pub order: Option<(&'static str, SortDirection)>,
}

impl ListQuery {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            filter: None,
            order: None,
        }
    }

    /// Adds `WHERE column = id`. The column must belong to the resource.
    pub fn filter_by(mut self, column: &str, id: Uuid) -> Result<Self, UpdateError> {
        let col = self
            .resource
            .updatable_column(column)
            .ok_or_else(|| UpdateError::UnknownField(column.to_string()))?;
        self.filter = Some((col, id));
        Ok(self)
    }

    pub fn order_by(mut self, column: &'static str, direction: SortDirection) -> Self {
        self.order = Some((column, direction));
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut query = format!("SELECT * FROM {}", quote_identifier(self.resource.table()));
        let mut params = Vec::new();

        if let Some((column, id)) = &self.filter {
            query.push_str(&format!(" WHERE {}", placeholder(column, 1)));
            params.push(Value::String(id.to_string()));
        }
        if let Some((column, direction)) = &self.order {
            query.push_str(&format!(" ORDER BY {} {}", quote_identifier(column), direction.to_sql()));
        }

        SqlResult {
            query: format!("SELECT row_to_json(t) AS record FROM ({}) t", query),
            params,
        }
    }
}

pub fn select_by_id(resource: Resource, id: Uuid) -> SqlResult {
    SqlResult {
        query: format!(
            "SELECT row_to_json(t) AS record FROM (SELECT * FROM {} WHERE {}) t",
            quote_identifier(resource.table()),
            placeholder(&ID_COLUMN, 1)
        ),
        params: vec![Value::String(id.to_string())],
    }
}

pub fn delete_by_id(resource: Resource, id: Uuid) -> SqlResult {
    SqlResult {
        query: format!(
            "DELETE FROM {} WHERE {}",
            quote_identifier(resource.table()),
            placeholder(&ID_COLUMN, 1)
        ),
        params: vec![Value::String(id.to_string())],
    }
}

/// `"col" = $n::type`
fn placeholder(column: &Column, index: usize) -> String {
    format!("{} = {}", quote_identifier(column.name), param(column, index))
}

/// `$n::type`
fn param(column: &Column, index: usize) -> String {
    format!("${}::{}", index, column.sql_type.cast())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn empty_map_is_rejected() {
        let builder = PartialUpdateBuilder::new(Resource::Task);
        let result = builder.build(Uuid::new_v4(), Map::new());
        assert_eq!(result, Err(UpdateError::EmptyUpdate));
    }

    #[test]
    fn one_assignment_per_field() {
        let id = Uuid::new_v4();
        let op = PartialUpdateBuilder::new(Resource::Task)
            .build(id, fields(json!({ "status": "done", "title": "Ship it", "order_index": 3 })))
            .unwrap();

        assert_eq!(op.target_id, id);
        assert_eq!(op.table(), "tasks");
        assert_eq!(op.assignments.len(), 3);

        let sql = op.to_sql();
        assert_eq!(sql.params.len(), 4);
        assert_eq!(sql.params[0], json!(id.to_string()));
        assert!(sql.query.contains("WHERE \"id\" = $1::uuid"));
        for (i, assignment) in op.assignments.iter().enumerate() {
            let expected = format!(
                "\"{}\" = ${}::{}",
                assignment.column.name,
                i + 2,
                assignment.column.sql_type.cast()
            );
            assert!(sql.query.contains(&expected), "missing {} in {}", expected, sql.query);
            assert_eq!(sql.params[i + 1], assignment.value);
        }
        assert!(sql.query.contains("\"order_index\" = $"));
        assert!(sql.query.contains("::integer"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = PartialUpdateBuilder::new(Resource::Board)
            .build(Uuid::new_v4(), fields(json!({ "name": "ok", "status = 'x'; --": 1 })));
        assert_eq!(result, Err(UpdateError::UnknownField("status = 'x'; --".to_string())));
    }

    #[test]
    fn columns_are_scoped_to_the_resource() {
        // `status` belongs to tasks, not boards
        let result = PartialUpdateBuilder::new(Resource::Board).build(Uuid::new_v4(), fields(json!({ "status": "done" })));
        assert_eq!(result, Err(UpdateError::UnknownField("status".to_string())));
    }

    #[test]
    fn values_never_reach_the_command_text() {
        let payload = "\"); DROP TABLE x; --";
        let op = PartialUpdateBuilder::new(Resource::Task)
            .build(Uuid::new_v4(), fields(json!({ "title": payload, "description": payload })))
            .unwrap();

        let sql = op.to_sql();
        assert!(!sql.query.contains(payload));
        assert!(!sql.query.contains("DROP"));
        assert_eq!(sql.params.iter().filter(|p| **p == json!(payload)).count(), 2);
    }

    #[test]
    fn assignment_order_is_deterministic() {
        let body = json!({ "title": "a", "status": "b", "priority": "c" });
        let builder = PartialUpdateBuilder::new(Resource::Task);
        let first = builder.build(Uuid::nil(), fields(body.clone())).unwrap().to_sql();
        let second = builder.build(Uuid::nil(), fields(body)).unwrap().to_sql();
        assert_eq!(first.query, second.query);
        assert_eq!(first.params, second.params);
    }

    #[test]
    fn insert_renders_placeholders_only() {
        let op = InsertOperation::new(
            Resource::Comment,
            vec![
                ("id", json!(Uuid::nil().to_string())),
                ("task_id", json!(Uuid::nil().to_string())),
                ("author_id", json!(Uuid::nil().to_string())),
                ("body", json!("it's done'); --")),
            ],
        )
        .unwrap();

        let sql = op.to_sql();
        assert!(sql.query.starts_with("WITH r AS (INSERT INTO \"comments\""));
        assert!(sql.query.contains("VALUES ($1::uuid, $2::uuid, $3::uuid, $4::text)"));
        assert!(!sql.query.contains("it's done"));
        assert_eq!(sql.params.len(), 4);
    }

    #[test]
    fn insert_rejects_columns_outside_the_table() {
        let err = InsertOperation::new(Resource::List, vec![("title", json!("x"))]).unwrap_err();
        assert_eq!(err, UpdateError::UnknownField("title".to_string()));
    }

    #[test]
    fn list_query_filters_and_orders() {
        let board = Uuid::new_v4();
        let sql = ListQuery::new(Resource::List)
            .filter_by("board_id", board)
            .unwrap()
            .order_by("order_index", SortDirection::Asc)
            .to_sql();
        assert_eq!(
            sql.query,
            "SELECT row_to_json(t) AS record FROM (SELECT * FROM \"lists\" WHERE \"board_id\" = $1::uuid ORDER BY \"order_index\" ASC) t"
        );
        assert_eq!(sql.params, vec![json!(board.to_string())]);
    }

    #[test]
    fn list_filter_rejects_columns_outside_the_table() {
        let err = ListQuery::new(Resource::Task).filter_by("boardid", Uuid::nil()).unwrap_err();
        assert_eq!(err, UpdateError::UnknownField("boardid".to_string()));
    }

    #[test]
    fn delete_targets_one_row() {
        let sql = delete_by_id(Resource::Workspace, Uuid::nil());
        assert_eq!(sql.query, "DELETE FROM \"workspaces\" WHERE \"id\" = $1::uuid");
    }
}
