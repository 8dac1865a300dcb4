//! Record sink factory
//!
//! Builds the configured [`RecordSink`] implementation.

use crate::adapters::database::traits::RecordSink;
use crate::adapters::memory::MemorySink;
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::{DatabaseTarget, PosloadConfig};
use crate::domain::{PosloadError, Result};
use std::sync::Arc;

/// Create a record sink based on the configuration
///
/// # Errors
///
/// Returns an error if the PostgreSQL section is missing for a PostgreSQL
/// target or the connection pool cannot be created.
pub async fn create_record_sink(config: &PosloadConfig) -> Result<Arc<dyn RecordSink>> {
    match config.database_target {
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                PosloadError::Configuration(
                    "postgresql configuration is required when database_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL record sink");
            let client = PostgreSQLClient::new(pg_config.clone()).await?;
            let adapter = PostgreSQLAdapter::new(client);

            Ok(Arc::new(adapter) as Arc<dyn RecordSink>)
        }
        DatabaseTarget::Memory => {
            tracing::warn!("Using in-memory record sink; loaded rows are lost at exit");
            Ok(Arc::new(MemorySink::new()) as Arc<dyn RecordSink>)
        }
    }
}
