//! Ingest command implementation
//!
//! Runs one ingestion and maps its outcome onto an exit code.

use crate::adapters::database::create_record_sink;
use crate::cli::exit_code;
use crate::config::schema::DatabaseTarget;
use crate::config::{load_config, PosloadConfig};
use crate::core::ingest::{
    DocumentLocator, FixedDocument, Ingestor, InputDirectory, TracingReporter,
};
use crate::domain::IngestError;
use crate::log_error_with_context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Ingest this file instead of searching the input directory
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Parse and normalize only; nothing is written
    #[arg(long)]
    pub dry_run: bool,
}

impl IngestArgs {
    /// Execute the ingest command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(exit_code::CONFIG_ERROR);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        let dry_run = config.application.dry_run;

        let locator = match self.locator(&config) {
            Ok(locator) => locator,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(exit_code::CONFIG_ERROR);
            }
        };

        let sink = match create_record_sink(&config).await {
            Ok(sink) => sink,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create record sink");
                eprintln!("❌ {e}");
                return Ok(exit_code::CONFIG_ERROR);
            }
        };

        if !dry_run {
            if let Err(e) = sink.test_connection().await {
                log_error_with_context!(&e, "Storage is not reachable");
                eprintln!("❌ {e}");
                return Ok(exit_code::STORAGE_UNAVAILABLE);
            }

            if bootstrap_schema(&config) {
                if let Err(e) = sink.ensure_schema().await {
                    log_error_with_context!(&e, "Schema bootstrap failed");
                    eprintln!("❌ {e}");
                    return Ok(exit_code::STORAGE_UNAVAILABLE);
                }
            }
        }

        let ingestor =
            Ingestor::new(locator, sink, Arc::new(TracingReporter)).with_dry_run(dry_run);

        match ingestor.run().await {
            Ok(report) => {
                report.print_summary();
                if report.dry_run {
                    println!("\n🔍 Dry run: nothing was written");
                } else {
                    println!("\n✅ Loaded {}", report.document.display());
                    if let Some(note) = config.database_target.persistence_note() {
                        tracing::warn!("Loaded rows are not persisted by the memory target");
                        println!("⚠️  {note}");
                    }
                }
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                eprintln!("❌ {e}");
                Ok(outcome_exit_code(&e))
            }
        }
    }

    fn locator(&self, config: &PosloadConfig) -> crate::domain::Result<Box<dyn DocumentLocator>> {
        Ok(match &self.file {
            Some(path) => Box::new(FixedDocument::new(path)),
            None => Box::new(InputDirectory::from_config(&config.input)?),
        })
    }
}

fn bootstrap_schema(config: &PosloadConfig) -> bool {
    match config.database_target {
        DatabaseTarget::PostgreSQL => config
            .postgresql
            .as_ref()
            .is_some_and(|pg| pg.bootstrap_schema),
        DatabaseTarget::Memory => true,
    }
}

fn outcome_exit_code(error: &IngestError) -> i32 {
    match error {
        IngestError::InputNotFound { .. } => exit_code::INPUT_NOT_FOUND,
        IngestError::Parse { .. } => exit_code::PARSE_ERROR,
        IngestError::Load { .. } => exit_code::LOAD_ERROR,
    }
}
