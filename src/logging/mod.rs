//! Logging and observability
//!
//! Structured logging with:
//! - Human-readable console output
//! - Optional JSON log files with daily or hourly rotation
//! - A `posload=<level>` filter overridable through `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use posload::logging::init_logging;
//! use posload::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an ingestion run
///
/// # Example
///
/// ```no_run
/// use posload::log_run_start;
///
/// let run_id = uuid::Uuid::new_v4();
/// log_run_start!(run_id, "input/Venue1_20240101.json");
/// ```
#[macro_export]
macro_rules! log_run_start {
    ($run_id:expr, $document:expr) => {
        tracing::info!(
            run_id = %$run_id,
            document = %$document,
            "Starting ingestion"
        );
    };
}

/// Log the completion of an ingestion run from its report
#[macro_export]
macro_rules! log_run_complete {
    ($report:expr) => {
        tracing::info!(
            run_id = %$report.run_id,
            document = %$report.document.display(),
            digest = %$report.digest,
            outcome = %$report.state,
            rows = $report.counts.total(),
            duration_ms = $report.duration.as_millis() as u64,
            "Ingestion completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use posload::log_error_with_context;
/// use posload::domain::PosloadError;
///
/// let error = PosloadError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
