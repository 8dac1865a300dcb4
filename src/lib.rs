// posload - POS export ingestion into PostgreSQL
// Copyright (c) 2025 posload Contributors
// Licensed under the MIT License

//! # posload - POS export ingestion
//!
//! posload reads nested point-of-sale exports (venues → stores →
//! transactions → items → products and promos), flattens them into six
//! deduplicated relational record sets and bulk-loads them in a single
//! transaction.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Normalization, bulk loading and the ingestion run
//! - [`adapters`] - Record sinks (PostgreSQL, in-memory)
//! - [`domain`] - Record types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use posload::adapters::database::create_record_sink;
//! use posload::config::load_config;
//! use posload::core::ingest::{Ingestor, InputDirectory, TracingReporter};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("posload.toml")?;
//!     let sink = create_record_sink(&config).await?;
//!     sink.ensure_schema().await?;
//!
//!     let report = Ingestor::new(
//!         Box::new(InputDirectory::from_config(&config.input)?),
//!         sink,
//!         Arc::new(TracingReporter),
//!     )
//!     .run()
//!     .await?;
//!
//!     println!("Loaded {} ({})", report.document.display(), report.counts);
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - Records are deduplicated on their natural keys; the first occurrence wins.
//! - Items are keyed by `(LineID, TransactionID)`. Promos are never deduplicated.
//! - A malformed document never reaches storage.
//! - A load either commits every record of the document or none of them.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
