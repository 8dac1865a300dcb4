//! Domain error types
//!
//! This module defines the error hierarchy for posload. All errors are
//! domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main posload error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum PosloadError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Ingestion run failures (not found, parse, load)
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Database-related errors (generic)
    #[error("Database error: {0}")]
    Database(String),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Outcome errors of a single ingestion run
///
/// Each variant maps to one terminal failure of the run state machine.
/// None of them are retried internally.
#[derive(Debug, Error)]
pub enum IngestError {
    /// No input document was available to process
    #[error("No input document found in {}", location.display())]
    InputNotFound {
        /// Directory or file that was searched
        location: PathBuf,
    },

    /// The document could not be read, is not valid JSON of the expected
    /// shape, or a field failed a required coercion
    #[error("Failed to parse {}: {message}", document.display())]
    Parse {
        /// Document being parsed
        document: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Storage rejected the write; everything attempted in the run was rolled back
    #[error("Failed to load {}: {source}", document.display())]
    Load {
        /// Document whose records were being persisted
        document: PathBuf,
        /// Underlying persistence failure
        source: LoadError,
    },
}

impl IngestError {
    /// Short machine-friendly label for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::InputNotFound { .. } => "input_not_found",
            IngestError::Parse { .. } => "parse_error",
            IngestError::Load { .. } => "load_error",
        }
    }
}

/// Persistence failures raised while loading records
///
/// These errors don't expose the storage driver's types.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Could not obtain a connection or open a transaction
    #[error("Storage connection failed: {0}")]
    ConnectionFailed(String),

    /// A bulk insert was rejected (constraint violation, type mismatch, ...)
    #[error("Insert into {table} failed: {message}")]
    InsertFailed {
        /// Target table
        table: &'static str,
        /// Driver message
        message: String,
    },

    /// The commit itself failed
    #[error("Commit failed: {0}")]
    CommitFailed(String),

    /// Rollback failed after an earlier error
    #[error("Rollback failed: {0}")]
    RollbackFailed(String),
}

/// Failure raised by a field coercion rule
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// Timestamp did not match `day/month/year hh:mm:ss AM|PM`
    #[error("Transaction {transaction_id}: invalid DateTimeUTC '{value}': {reason}")]
    InvalidTimestamp {
        /// Transaction carrying the bad value
        transaction_id: i64,
        /// Raw source value
        value: String,
        /// Parser message
        reason: String,
    },

    /// A required field was absent
    #[error("{entity} {context}: missing required field {field}")]
    MissingField {
        /// Entity kind name
        entity: &'static str,
        /// Identifying context (keys of the enclosing node)
        context: String,
        /// Field name as it appears in the source
        field: &'static str,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for PosloadError {
    fn from(err: std::io::Error) -> Self {
        PosloadError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PosloadError {
    fn from(err: serde_json::Error) -> Self {
        PosloadError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PosloadError {
    fn from(err: toml::de::Error) -> Self {
        PosloadError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posload_error_display() {
        let err = PosloadError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_ingest_error_conversion() {
        let ingest_err = IngestError::InputNotFound {
            location: PathBuf::from("input"),
        };
        let err: PosloadError = ingest_err.into();
        assert!(matches!(err, PosloadError::Ingest(_)));
        assert_eq!(err.to_string(), "No input document found in input");
    }

    #[test]
    fn test_ingest_error_kinds() {
        let parse = IngestError::Parse {
            document: PathBuf::from("Venue1_a_b.json"),
            message: "bad".to_string(),
        };
        let load = IngestError::Load {
            document: PathBuf::from("Venue1_a_b.json"),
            source: LoadError::CommitFailed("gone".to_string()),
        };
        assert_eq!(parse.kind(), "parse_error");
        assert_eq!(load.kind(), "load_error");
        assert!(load.to_string().contains("Commit failed: gone"));
    }

    #[test]
    fn test_load_error_names_table() {
        let err = LoadError::InsertFailed {
            table: "promos",
            message: "duplicate key".to_string(),
        };
        assert_eq!(err.to_string(), "Insert into promos failed: duplicate key");
    }

    #[test]
    fn test_coercion_error_display() {
        let err = CoercionError::InvalidTimestamp {
            transaction_id: 7,
            value: "2023-12-25".to_string(),
            reason: "input contains invalid characters".to_string(),
        };
        assert!(err.to_string().starts_with("Transaction 7: invalid DateTimeUTC"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: PosloadError = io_err.into();
        assert!(matches!(err, PosloadError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PosloadError = json_err.into();
        assert!(matches!(err, PosloadError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: PosloadError = toml_err.into();
        assert!(matches!(err, PosloadError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_posload_error_implements_std_error() {
        let err = PosloadError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
