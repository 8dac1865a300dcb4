//! Core business logic for posload.
//!
//! # Modules
//!
//! - [`normalize`] - Typed source model, field coercion and deduplication
//! - [`load`] - All-or-nothing bulk loading through a record sink
//! - [`ingest`] - Document discovery and the run state machine
//!
//! # Ingestion Workflow
//!
//! 1. **Locate**: pick the input document
//! 2. **Read**: parse the JSON export into typed source structs
//! 3. **Normalize**: flatten and deduplicate into six record sets
//! 4. **Load**: insert all sets in one transaction, parents first
//! 5. **Report**: emit the outcome with counts and the document digest
//!
//! # Example
//!
//! ```rust,no_run
//! use posload::adapters::database::create_record_sink;
//! use posload::config::load_config;
//! use posload::core::ingest::{Ingestor, InputDirectory, TracingReporter};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("posload.toml")?;
//! let sink = create_record_sink(&config).await?;
//!
//! let ingestor = Ingestor::new(
//!     Box::new(InputDirectory::from_config(&config.input)?),
//!     sink,
//!     Arc::new(TracingReporter),
//! );
//!
//! let report = ingestor.run().await?;
//! println!("Loaded {}: {}", report.document.display(), report.counts);
//! # Ok(())
//! # }
//! ```

pub mod ingest;
pub mod load;
pub mod normalize;
