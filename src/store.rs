//! Record store: one SQLite file, one table, parameterized statements only.

use crate::error::AppError;
use crate::record::{NewRecord, Record};
use crate::sql::{create_table, insert, insert_if_absent, select_by_id, QueryBuf};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;

/// Handle to the demons table. Constructed once at startup and cloned into request state.
#[derive(Clone, Debug)]
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    /// Open (creating the file if missing) the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;
        Ok(RecordStore { pool })
    }

    /// Private in-memory database. A single long-lived connection keeps it alive.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(RecordStore { pool })
    }

    /// Create the table if absent. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(&create_table()).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert unless a record with the same name exists. Returns whether a row was written.
    pub async fn insert_if_absent(&self, record: &NewRecord) -> Result<bool, AppError> {
        let q = insert_if_absent(record);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query::<Sqlite>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let done = query.execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    /// Insert and return the stored row. A duplicate name is [`AppError::Conflict`].
    pub async fn insert(&self, record: &NewRecord) -> Result<Record, AppError> {
        let q = insert(record);
        match self.fetch_optional(&q).await {
            Ok(Some(row)) => Ok(row),
            Ok(None) => Err(AppError::Db(sqlx::Error::RowNotFound)),
            Err(AppError::Conflict(_)) => Err(AppError::Conflict(format!(
                "a demon named '{}' already exists",
                record.name
            ))),
            Err(e) => Err(e),
        }
    }

    /// Run a read built by [`crate::sql`]; rows come back in statement order.
    pub async fn query(&self, q: &QueryBuf) -> Result<Vec<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<Sqlite, Record>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn fetch(&self, id: i64) -> Result<Option<Record>, AppError> {
        self.fetch_optional(&select_by_id(id)).await
    }

    /// Cheap round trip used by readiness checks.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<Sqlite, Record>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }
}
