//! Run states and outcome reporting

use crate::core::normalize::RecordCounts;
use crate::domain::IngestError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// Position of an ingestion run in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Reading,
    Normalizing,
    Loading,
    Committed,
    RolledBack,
    ParseFailed,
    DryRunCompleted,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Committed
                | RunState::RolledBack
                | RunState::ParseFailed
                | RunState::DryRunCompleted
        )
    }

    /// Whether a run may move from `self` to `next`
    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Idle, Reading)
                | (Reading, Normalizing)
                | (Reading, ParseFailed)
                | (Normalizing, Loading)
                | (Normalizing, ParseFailed)
                | (Normalizing, DryRunCompleted)
                | (Loading, Committed)
                | (Loading, RolledBack)
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Reading => "reading",
            RunState::Normalizing => "normalizing",
            RunState::Loading => "loading",
            RunState::Committed => "committed",
            RunState::RolledBack => "rolled_back",
            RunState::ParseFailed => "parse_failed",
            RunState::DryRunCompleted => "dry_run_completed",
        };
        f.write_str(name)
    }
}

/// Confirmation of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub run_id: Uuid,
    /// Document that was ingested
    pub document: PathBuf,
    /// Hex SHA-256 of the document bytes
    pub digest: String,
    /// Rows inserted, or rows that would be inserted on a dry run
    pub counts: RecordCounts,
    pub state: RunState,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

impl IngestReport {
    pub fn is_committed(&self) -> bool {
        self.state == RunState::Committed
    }

    pub fn print_summary(&self) {
        println!("\n📊 Ingestion Summary");
        println!("====================");
        println!("Run ID:    {}", self.run_id);
        println!("Document:  {}", self.document.display());
        println!("SHA-256:   {}", self.digest);
        println!("Outcome:   {}", self.state);
        println!("Duration:  {:.2}s", self.duration.as_secs_f64());
        println!();
        let verb = if self.dry_run { "Would insert" } else { "Inserted" };
        println!("{verb}:");
        println!("  Venues:       {}", self.counts.venues);
        println!("  Stores:       {}", self.counts.stores);
        println!("  Transactions: {}", self.counts.transactions);
        println!("  Products:     {}", self.counts.products);
        println!("  Items:        {}", self.counts.items);
        println!("  Promos:       {}", self.counts.promos);
    }
}

/// Observer of run lifecycle events
pub trait RunReporter: Send + Sync {
    fn transition(&self, run_id: Uuid, from: RunState, to: RunState);

    fn completed(&self, report: &IngestReport);

    fn failed(&self, run_id: Uuid, error: &IngestError);
}

/// Reports run events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl RunReporter for TracingReporter {
    fn transition(&self, run_id: Uuid, from: RunState, to: RunState) {
        tracing::debug!(%run_id, %from, %to, "Run state changed");
    }

    fn completed(&self, report: &IngestReport) {
        crate::log_run_complete!(report);
    }

    fn failed(&self, run_id: Uuid, error: &IngestError) {
        tracing::error!(
            %run_id,
            error_kind = error.kind(),
            error = %error,
            "Ingestion failed"
        );
    }
}

/// Event captured by [`RecordingReporter`]
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Transition(RunState, RunState),
    Completed(RunState),
    Failed(&'static str),
}

/// Keeps every event in memory, for assertions in tests and embedding code
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.lock().clone()
    }

    /// States entered, in order
    pub fn states(&self) -> Vec<RunState> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                RunEvent::Transition(_, to) => Some(*to),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RunEvent>> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl RunReporter for RecordingReporter {
    fn transition(&self, _run_id: Uuid, from: RunState, to: RunState) {
        self.lock().push(RunEvent::Transition(from, to));
    }

    fn completed(&self, report: &IngestReport) {
        self.lock().push(RunEvent::Completed(report.state));
    }

    fn failed(&self, _run_id: Uuid, error: &IngestError) {
        self.lock().push(RunEvent::Failed(error.kind()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(RunState::Committed.is_terminal());
        assert!(RunState::RolledBack.is_terminal());
        assert!(RunState::ParseFailed.is_terminal());
        assert!(RunState::DryRunCompleted.is_terminal());
        assert!(!RunState::Loading.is_terminal());
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        let all = [
            RunState::Idle,
            RunState::Reading,
            RunState::Normalizing,
            RunState::Loading,
            RunState::Committed,
            RunState::RolledBack,
            RunState::ParseFailed,
            RunState::DryRunCompleted,
        ];
        for from in all.iter().filter(|s| s.is_terminal()) {
            for to in all {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_storage_is_only_reached_after_normalizing() {
        assert!(RunState::Normalizing.can_transition_to(RunState::Loading));
        assert!(!RunState::Reading.can_transition_to(RunState::Loading));
        assert!(!RunState::Loading.can_transition_to(RunState::ParseFailed));
    }

    #[test]
    fn test_recording_reporter() {
        let reporter = RecordingReporter::new();
        let run_id = Uuid::new_v4();
        reporter.transition(run_id, RunState::Idle, RunState::Reading);
        reporter.failed(
            run_id,
            &IngestError::InputNotFound {
                location: PathBuf::from("input"),
            },
        );

        assert_eq!(reporter.states(), vec![RunState::Reading]);
        assert_eq!(
            reporter.events()[1],
            RunEvent::Failed("input_not_found")
        );
    }
}
