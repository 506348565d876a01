//! Table definitions for the task board resources.
//!
//! Every column that can be written through the API is listed here together
//! with its SQL type. The update builder treats this list as an allow-list:
//! a field name that does not appear under the addressed resource never
//! reaches the command text.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SqlType {
    Uuid,
    Text,
    Integer,
    BigInt,
    Timestamp,
}

impl SqlType {
    /// Cast suffix applied to a bound parameter.
    pub fn cast(&self) -> &'static str {
        match self {
            SqlType::Uuid => "uuid",
            SqlType::Text => "text",
            SqlType::Integer => "integer",
            SqlType::BigInt => "bigint",
            SqlType::Timestamp => "timestamptz",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
}

const fn col(name: &'static str, sql_type: SqlType) -> Column {
    Column { name, sql_type }
}

const WORKSPACE_COLUMNS: &[Column] = &[
    col("name", SqlType::Text),
    col("created_by", SqlType::Uuid),
    col("plan_tier", SqlType::Text),
];

const BOARD_COLUMNS: &[Column] = &[
    col("name", SqlType::Text),
    col("workspace_id", SqlType::Uuid),
    col("order_index", SqlType::Integer),
];

const LIST_COLUMNS: &[Column] = &[
    col("name", SqlType::Text),
    col("board_id", SqlType::Uuid),
    col("order_index", SqlType::Integer),
];

const TASK_COLUMNS: &[Column] = &[
    col("title", SqlType::Text),
    col("description", SqlType::Text),
    col("status", SqlType::Text),
    col("priority", SqlType::Text),
    col("due_date", SqlType::Timestamp),
    col("order_index", SqlType::Integer),
    col("board_id", SqlType::Uuid),
    col("list_id", SqlType::Uuid),
    col("workspace_id", SqlType::Uuid),
    col("created_by_id", SqlType::Uuid),
    col("assignee_id", SqlType::Uuid),
];

const COMMENT_COLUMNS: &[Column] = &[
    col("task_id", SqlType::Uuid),
    col("author_id", SqlType::Uuid),
    col("body", SqlType::Text),
];

const ATTACHMENT_COLUMNS: &[Column] = &[
    col("task_id", SqlType::Uuid),
    col("file_name", SqlType::Text),
    col("url", SqlType::Text),
    col("size", SqlType::BigInt),
    col("mime_type", SqlType::Text),
    col("uploaded_by_id", SqlType::Uuid),
];

const NOTIFICATION_COLUMNS: &[Column] = &[
    col("user_id", SqlType::Uuid),
    col("kind", SqlType::Text),
    col("message", SqlType::Text),
    col("task_id", SqlType::Uuid),
    col("read_at", SqlType::Timestamp),
];

/// Primary key column shared by every resource table.
pub const ID_COLUMN: Column = col("id", SqlType::Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Workspace,
    Board,
    List,
    Task,
    Comment,
    Attachment,
    Notification,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Workspace,
        Resource::Board,
        Resource::List,
        Resource::Task,
        Resource::Comment,
        Resource::Attachment,
        Resource::Notification,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            Resource::Workspace => "workspaces",
            Resource::Board => "boards",
            Resource::List => "lists",
            Resource::Task => "tasks",
            Resource::Comment => "comments",
            Resource::Attachment => "attachments",
            Resource::Notification => "notifications",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Workspace => "Workspace",
            Resource::Board => "Board",
            Resource::List => "List",
            Resource::Task => "Task",
            Resource::Comment => "Comment",
            Resource::Attachment => "Attachment",
            Resource::Notification => "Notification",
        }
    }

    /// Columns a client may set through a partial update.
    pub fn updatable_columns(&self) -> &'static [Column] {
        match self {
            Resource::Workspace => WORKSPACE_COLUMNS,
            Resource::Board => BOARD_COLUMNS,
            Resource::List => LIST_COLUMNS,
            Resource::Task => TASK_COLUMNS,
            Resource::Comment => COMMENT_COLUMNS,
            Resource::Attachment => ATTACHMENT_COLUMNS,
            Resource::Notification => NOTIFICATION_COLUMNS,
        }
    }

    pub fn updatable_column(&self, name: &str) -> Option<&'static Column> {
        self.updatable_columns().iter().find(|c| c.name == name)
    }

    /// Lookup used by inserts, which may also set the primary key.
    pub fn insertable_column(&self, name: &str) -> Option<&'static Column> {
        if name == ID_COLUMN.name {
            return Some(&ID_COLUMN);
        }
        self.updatable_column(name)
    }
}
