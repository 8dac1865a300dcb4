//! Single ingestion run
//!
//! Drives one document through `Idle → Reading → Normalizing → Loading` and
//! into a terminal state. Storage is only touched once the whole document
//! has been parsed and normalized.

use crate::adapters::database::traits::RecordSink;
use crate::core::ingest::locator::DocumentLocator;
use crate::core::ingest::report::{IngestReport, RunReporter, RunState};
use crate::core::load::BulkLoader;
use crate::core::normalize::{normalize, SourceDocument};
use crate::domain::IngestError;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Runs ingestion against injected collaborators
///
/// ```rust,no_run
/// use posload::adapters::memory::MemorySink;
/// use posload::core::ingest::{Ingestor, InputDirectory, TracingReporter};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let ingestor = Ingestor::new(
///     Box::new(InputDirectory::new("input", "Venue*_*.json")?),
///     Arc::new(MemorySink::new()),
///     Arc::new(TracingReporter),
/// );
/// let report = ingestor.run().await?;
/// println!("{}", report.counts);
/// # Ok(())
/// # }
/// ```
pub struct Ingestor {
    locator: Box<dyn DocumentLocator>,
    loader: BulkLoader,
    reporter: Arc<dyn RunReporter>,
    dry_run: bool,
}

impl Ingestor {
    pub fn new(
        locator: Box<dyn DocumentLocator>,
        sink: Arc<dyn RecordSink>,
        reporter: Arc<dyn RunReporter>,
    ) -> Self {
        Self {
            locator,
            loader: BulkLoader::new(sink),
            reporter,
            dry_run: false,
        }
    }

    /// Stop after normalizing, without opening a storage transaction
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute one run
    ///
    /// # Errors
    ///
    /// - [`IngestError::InputNotFound`] if the locator has no document
    /// - [`IngestError::Parse`] if the document is unreadable or malformed;
    ///   storage is not touched
    /// - [`IngestError::Load`] if storage rejected the records; all writes of
    ///   the run are rolled back
    pub async fn run(&self) -> Result<IngestReport, IngestError> {
        let mut tracker = RunTracker {
            id: Uuid::new_v4(),
            state: RunState::Idle,
            reporter: self.reporter.as_ref(),
        };
        let span = tracing::info_span!("ingest", run_id = %tracker.id, dry_run = self.dry_run);

        self.execute(&mut tracker).instrument(span).await
    }

    async fn execute(&self, run: &mut RunTracker<'_>) -> Result<IngestReport, IngestError> {
        let started_at = Utc::now();
        let start = Instant::now();

        let document = match self.locator.locate().await {
            Ok(path) => path,
            Err(e) => {
                run.reporter.failed(run.id, &e);
                return Err(e);
            }
        };
        crate::log_run_start!(run.id, document.display());

        run.advance(RunState::Reading);
        let bytes = match tokio::fs::read(&document).await {
            Ok(bytes) => bytes,
            Err(e) => return Err(run.parse_failed(document, format!("cannot read file: {e}"))),
        };
        let digest = format!("{:x}", Sha256::digest(&bytes));

        let source = match SourceDocument::from_slice(&bytes) {
            Ok(source) => source,
            Err(e) => return Err(run.parse_failed(document, e.to_string())),
        };
        drop(bytes);

        run.advance(RunState::Normalizing);
        let records = match normalize(&source) {
            Ok(records) => records,
            Err(e) => return Err(run.parse_failed(document, e.to_string())),
        };
        drop(source);

        let counts = if self.dry_run {
            run.advance(RunState::DryRunCompleted);
            records.counts()
        } else {
            run.advance(RunState::Loading);
            match self.loader.load(&records).await {
                Ok(counts) => {
                    run.advance(RunState::Committed);
                    counts
                }
                Err(source) => {
                    run.advance(RunState::RolledBack);
                    let err = IngestError::Load { document, source };
                    run.reporter.failed(run.id, &err);
                    return Err(err);
                }
            }
        };

        let report = IngestReport {
            run_id: run.id,
            document,
            digest,
            counts,
            state: run.state,
            dry_run: self.dry_run,
            started_at,
            duration: start.elapsed(),
        };
        run.reporter.completed(&report);
        Ok(report)
    }
}

struct RunTracker<'r> {
    id: Uuid,
    state: RunState,
    reporter: &'r dyn RunReporter,
}

impl RunTracker<'_> {
    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal run transition {} -> {}",
            self.state,
            next
        );
        self.reporter.transition(self.id, self.state, next);
        self.state = next;
    }

    fn parse_failed(&mut self, document: PathBuf, message: String) -> IngestError {
        self.advance(RunState::ParseFailed);
        let err = IngestError::Parse { document, message };
        self.reporter.failed(self.id, &err);
        err
    }
}
