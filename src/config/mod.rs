//! Configuration management for posload.
//!
//! posload reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - `POSLOAD_<SECTION>_<KEY>` environment overrides
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! database_target = "postgresql"
//!
//! [application]
//! log_level = "info"
//! dry_run = false
//!
//! [input]
//! directory = "input"
//! file_pattern = "Venue*_*.json"
//!
//! [postgresql]
//! connection_string = "${POSLOAD_PG_DSN}"
//! ssl_mode = "prefer"
//!
//! [logging]
//! local_enabled = true
//! local_path = "logs"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use posload::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("posload.toml")?;
//! println!("Input directory: {}", config.input.directory);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DatabaseTarget, InputConfig, LoggingConfig, PosloadConfig,
    PostgreSQLConfig,
};
pub use secret::{redacted_connection_string, secret_string, SecretString, SecretValue};
