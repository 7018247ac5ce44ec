//! Event type definitions for progress reporting.

use crate::core::relocator::OperationOutcome;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted while sorting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Directory enumeration events
    Scan(ScanEvent),
    /// Per-file processing events
    File(FileEvent),
    /// Run-level events
    Run(RunEvent),
}

/// Events during directory enumeration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Enumeration has started
    Started { path: PathBuf, recursive: bool },
    /// An entry could not be read but enumeration continues
    Error { path: PathBuf, message: String },
    /// Enumeration completed
    Completed { total_files: usize },
}

/// Events for a single file, in the order its steps happen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FileEvent {
    /// Filesystem times are about to be rewritten
    TimestampUpdate {
        path: PathBuf,
        to: DateTime<Local>,
    },
    /// The correction was larger than the configured maximum and was skipped
    AdjustmentTooLarge {
        path: PathBuf,
        file_time: DateTime<Local>,
        resolved: DateTime<Local>,
        days: f64,
    },
    /// Embedded dates are about to be rewritten
    EmbeddedUpdate {
        path: PathBuf,
        to: DateTime<Local>,
    },
    /// One embedded slot could not be written; the rest continues
    MetadataWriteFailed {
        path: PathBuf,
        field: String,
        message: String,
    },
    /// An image is about to be sent for tagging
    Tagging { path: PathBuf, description: String },
    /// Tags came back
    Tagged { path: PathBuf, tags: Vec<String> },
    /// Tagging was skipped or failed for this file only
    TagSkipped { path: PathBuf, message: String },
    /// The file is about to be moved into `placement`
    Moving { path: PathBuf, placement: String },
    /// The file is done
    Completed {
        path: PathBuf,
        outcome: OperationOutcome,
    },
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    /// Processing has started
    Started { total_files: usize, dry_run: bool },
    /// Processing finished
    Completed { summary: RunSummary },
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files handed to the pipeline
    pub total_files: usize,
    /// Files moved (or that would be moved in a dry run)
    pub moved: usize,
    /// Files left in place because moving was disabled
    pub skipped: usize,
    /// Files whose timestamps were corrected without moving
    pub timestamps_updated: usize,
    /// Files that failed
    pub errors: usize,
    /// Whether nothing was mutated
    pub dry_run: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunSummary {
    /// Count one finished file
    pub fn record(&mut self, outcome: &OperationOutcome) {
        match outcome {
            OperationOutcome::Moved { .. } => self.moved += 1,
            OperationOutcome::Skipped { .. } => self.skipped += 1,
            OperationOutcome::TimestampsUpdated => self.timestamps_updated += 1,
            OperationOutcome::Error { .. } => self.errors += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::relocator::SkipReason;

    #[test]
    fn events_are_serializable() {
        let event = Event::File(FileEvent::Completed {
            path: PathBuf::from("/dump/a.jpg"),
            outcome: OperationOutcome::Moved {
                destination: PathBuf::from("/out/2024/01 January/a.jpg"),
            },
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::File(FileEvent::Completed { outcome, .. }) => {
                assert!(matches!(outcome, OperationOutcome::Moved { .. }));
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn summary_counts_each_outcome() {
        let mut summary = RunSummary::default();
        summary.record(&OperationOutcome::Moved {
            destination: PathBuf::from("/out/a"),
        });
        summary.record(&OperationOutcome::Skipped {
            reason: SkipReason::NoMove,
        });
        summary.record(&OperationOutcome::TimestampsUpdated);
        summary.record(&OperationOutcome::Error {
            reason: "locked".to_string(),
        });
        summary.record(&OperationOutcome::Error {
            reason: "collision".to_string(),
        });

        assert_eq!(summary.moved, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.timestamps_updated, 1);
        assert_eq!(summary.errors, 2);
    }
}
