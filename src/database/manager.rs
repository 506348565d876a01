use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors raised by the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Unexpected row shape from {0}")]
    RowShape(&'static str),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return DatabaseError::Conflict(constraint);
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Owns the connection pool for the lifetime of the process.
///
/// Built once at startup and handed to the stores that need it; nothing
/// reaches the pool through a global.
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        info!("Creating database connection pool (max {} connections)", config.max_connections);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!("Database connection pool created");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Quote SQL identifier to prevent injection
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
