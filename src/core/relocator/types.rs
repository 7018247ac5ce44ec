//! Types for the relocator module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default cap on how far a filesystem time may be corrected, in days
pub const DEFAULT_MAX_ADJUSTMENT_DAYS: u32 = 3650;

/// What the updater is allowed to do
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    /// Root under which `<year>/<MM Month>` folders are created
    pub output_root: PathBuf,
    /// Compute and report everything, mutate nothing
    pub dry_run: bool,
    /// Replace an existing file of the same name at the destination
    pub overwrite: bool,
    /// Rewrite filesystem and embedded times to the resolved timestamp
    pub update_timestamps: bool,
    /// Larger filesystem-time corrections are skipped with a warning
    pub max_adjustment_days: u32,
    /// Leave files where they are
    pub no_move: bool,
    /// Input was scanned recursively; relocation is disabled
    pub recursive: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("out"),
            dry_run: false,
            overwrite: false,
            update_timestamps: false,
            max_adjustment_days: DEFAULT_MAX_ADJUSTMENT_DAYS,
            no_move: false,
            recursive: false,
        }
    }
}

impl SortConfig {
    /// Whether files get moved at all
    pub fn moves_files(&self) -> bool {
        !self.no_move && !self.recursive
    }
}

/// Why a file stayed where it was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Moving was disabled
    NoMove,
    /// Recursive scans never relocate
    Recursive,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoMove => write!(f, "moving disabled"),
            SkipReason::Recursive => write!(f, "recursive scan"),
        }
    }
}

/// Per-file result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationOutcome {
    /// Moved (or would be, in a dry run) to `destination`
    Moved { destination: PathBuf },
    /// Left in place, nothing corrected
    Skipped { reason: SkipReason },
    /// Left in place, timestamps corrected
    TimestampsUpdated,
    /// Processing failed; the file was left where it was
    Error { reason: String },
}

/// What the timestamp-correction step did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    /// Filesystem times were (or would be) rewritten
    pub filesystem_updated: bool,
    /// The correction exceeded the limit and was skipped
    pub adjustment_too_large: bool,
    /// Embedded slots written (or that would be) successfully
    pub embedded_slots_written: usize,
}

impl CorrectionReport {
    pub fn changed_anything(&self) -> bool {
        self.filesystem_updated || self.embedded_slots_written > 0
    }
}
