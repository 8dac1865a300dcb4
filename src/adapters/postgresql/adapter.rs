//! PostgreSQL adapter implementing the record sink traits

use crate::adapters::database::traits::{RecordBatch, RecordSink, SinkTransaction};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{insert_statement, rows_per_statement, InsertRow};
use crate::core::normalize::RecordCounts;
use crate::domain::{LoadError, Result};
use async_trait::async_trait;
use deadpool_postgres::Object;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// PostgreSQL implementation of [`RecordSink`]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

#[async_trait]
impl RecordSink for PostgreSQLAdapter {
    fn sink_name(&self) -> &str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn begin(&self) -> std::result::Result<Box<dyn SinkTransaction>, LoadError> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(|e| LoadError::ConnectionFailed(e.to_string()))?;

        conn.batch_execute(&format!(
            "BEGIN; SET LOCAL statement_timeout = {}",
            self.client.statement_timeout_ms()
        ))
        .await
        .map_err(|e| LoadError::ConnectionFailed(describe(&e)))?;

        Ok(Box::new(PgTransaction {
            conn: Some(conn),
            chunk_size: self.client.config().insert_chunk_size,
        }))
    }

    async fn row_counts(&self) -> Result<RecordCounts> {
        self.client.row_counts().await
    }
}

/// An open `BEGIN ... COMMIT` block on one pooled connection
///
/// If dropped while still open the connection is detached from the pool and
/// closed, so the server aborts the transaction.
struct PgTransaction {
    conn: Option<Object>,
    chunk_size: usize,
}

impl PgTransaction {
    fn conn(&self) -> std::result::Result<&Object, LoadError> {
        self.conn
            .as_ref()
            .ok_or_else(|| LoadError::ConnectionFailed("transaction already closed".to_string()))
    }

    async fn insert_rows<T: InsertRow>(&self, rows: &[T]) -> std::result::Result<u64, LoadError> {
        let conn = self.conn()?;
        let per_statement = rows_per_statement(T::COLUMNS.len(), self.chunk_size);
        let mut written = 0;

        for chunk in rows.chunks(per_statement) {
            let sql = insert_statement(T::TABLE, T::COLUMNS, chunk.len());
            let mut params: Vec<&(dyn ToSql + Sync)> =
                Vec::with_capacity(chunk.len() * T::COLUMNS.len());
            for row in chunk {
                row.push_params(&mut params);
            }

            written += conn
                .execute(sql.as_str(), &params)
                .await
                .map_err(|e| LoadError::InsertFailed {
                    table: T::TABLE,
                    message: describe(&e),
                })?;
        }

        tracing::debug!(table = T::TABLE, rows = written, "Inserted batch");
        Ok(written)
    }

    async fn finish(mut self: Box<Self>, statement: &str) -> std::result::Result<(), String> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => return Err("transaction already closed".to_string()),
        };

        match conn.batch_execute(statement).await {
            Ok(()) => Ok(()),
            Err(e) => {
                // connection state is unknown; never hand it back to the pool
                drop(Object::take(conn));
                Err(describe(&e))
            }
        }
    }
}

impl Drop for PgTransaction {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::warn!("Open PostgreSQL transaction dropped; closing its connection");
            drop(Object::take(conn));
        }
    }
}

#[async_trait]
impl SinkTransaction for PgTransaction {
    async fn bulk_insert(&mut self, batch: RecordBatch<'_>) -> std::result::Result<u64, LoadError> {
        match batch {
            RecordBatch::Venues(rows) => self.insert_rows(rows).await,
            RecordBatch::Stores(rows) => self.insert_rows(rows).await,
            RecordBatch::Transactions(rows) => self.insert_rows(rows).await,
            RecordBatch::Products(rows) => self.insert_rows(rows).await,
            RecordBatch::Items(rows) => self.insert_rows(rows).await,
            RecordBatch::Promos(rows) => self.insert_rows(rows).await,
        }
    }

    async fn commit(self: Box<Self>) -> std::result::Result<(), LoadError> {
        self.finish("COMMIT").await.map_err(LoadError::CommitFailed)
    }

    async fn rollback(self: Box<Self>) -> std::result::Result<(), LoadError> {
        self.finish("ROLLBACK").await.map_err(LoadError::RollbackFailed)
    }
}

/// Server message and constraint for database errors, display text otherwise
fn describe(error: &tokio_postgres::Error) -> String {
    match error.as_db_error() {
        Some(db) => match db.constraint() {
            Some(constraint) => format!("{} (constraint {constraint})", db.message()),
            None => db.message().to_string(),
        },
        None => error.to_string(),
    }
}
