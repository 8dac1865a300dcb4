//! Ingestion runs
//!
//! Wires a [`DocumentLocator`], the normalizer and the bulk loader into one
//! run with a tracked lifecycle.
//!
//! - [`locator`] - Finds the document to ingest
//! - [`run`] - The [`Ingestor`] and its state machine
//! - [`report`] - [`RunState`], [`IngestReport`] and run reporters

pub mod locator;
pub mod report;
pub mod run;

pub use locator::{DocumentLocator, FixedDocument, InputDirectory};
pub use report::{IngestReport, RecordingReporter, RunEvent, RunReporter, RunState, TracingReporter};
pub use run::Ingestor;
