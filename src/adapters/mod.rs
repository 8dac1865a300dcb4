//! Storage integrations for posload.
//!
//! - [`database`] - Record sink abstraction (trait-based)
//! - [`postgresql`] - PostgreSQL implementation
//! - [`memory`] - In-process implementation for dry wiring and tests
//!
//! # Design Pattern
//!
//! Adapters isolate storage behind [`database::RecordSink`] so the loader can
//! be exercised without a database server.
//!
//! ```rust,no_run
//! use posload::adapters::database::create_record_sink;
//! use posload::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("posload.toml")?;
//! let sink = create_record_sink(&config).await?;
//! sink.test_connection().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod memory;
pub mod postgresql;
