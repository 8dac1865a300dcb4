//! Status command implementation
//!
//! Prints the committed row count of each table.

use crate::adapters::database::create_record_sink;
use crate::cli::exit_code;
use crate::config::load_config;
use crate::domain::EntityKind;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking table status");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIG_ERROR);
            }
        };

        let sink = match create_record_sink(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to create record sink");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIG_ERROR);
            }
        };

        let counts = match sink.row_counts().await {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to read table counts");
                println!("   Error: {e}");
                return Ok(exit_code::STORAGE_UNAVAILABLE);
            }
        };

        println!("📊 Table Status ({})", sink.sink_name());
        println!();
        for kind in EntityKind::LOAD_ORDER {
            println!("  {:<14}{:>10}", kind.table_name(), counts.get(kind));
        }
        println!("  {:<14}{:>10}", "total", counts.total());
        println!();
        if let Some(note) = config.database_target.persistence_note() {
            println!("⚠️  {note}");
            println!();
        }

        Ok(exit_code::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_status_on_memory_sink() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("posload.toml");
        std::fs::write(&path, "database_target = \"memory\"\n").unwrap();

        let code = StatusArgs {}.execute(path.to_str().unwrap()).await.unwrap();
        assert_eq!(code, exit_code::SUCCESS);
    }

    #[tokio::test]
    async fn test_status_missing_config() {
        let code = StatusArgs {}
            .execute("/nonexistent/posload.toml")
            .await
            .unwrap();
        assert_eq!(code, exit_code::CONFIG_ERROR);
    }
}
