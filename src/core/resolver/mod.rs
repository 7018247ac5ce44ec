//! # Resolver Module
//!
//! Picks the one timestamp a file is sorted by.
//!
//! ## Policy
//! 1. Filesystem candidate: creation time, else last write, else last
//!    access; each fallback happens only when the previous time is at or
//!    before the epoch floor.
//! 2. Embedded candidate: date taken, else date encoded, for media files
//!    only. Unreadable metadata counts as absent.
//! 3. The earliest candidate after the floor wins; with none, the result is
//!    [`ResolvedTimestamp::Unknown`].

use crate::core::metadata::MetadataReader;
use crate::core::scanner::FileRecord;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Times at or before this instant are treated as unset
pub fn epoch_floor() -> DateTime<Local> {
    DateTime::<Local>::from(std::time::UNIX_EPOCH)
}

/// Whether `time` clears the epoch floor
pub fn is_set(time: DateTime<Local>) -> bool {
    time > epoch_floor()
}

/// The canonical timestamp for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedTimestamp {
    /// Always strictly after the epoch floor
    Known(DateTime<Local>),
    /// No candidate cleared the floor
    Unknown,
}

impl ResolvedTimestamp {
    pub fn known(&self) -> Option<DateTime<Local>> {
        match self {
            ResolvedTimestamp::Known(time) => Some(*time),
            ResolvedTimestamp::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ResolvedTimestamp::Unknown)
    }
}

impl fmt::Display for ResolvedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedTimestamp::Known(time) => write!(f, "{}", time.format("%Y-%m-%d %H:%M:%S")),
            ResolvedTimestamp::Unknown => write!(f, "unknown"),
        }
    }
}

/// Everything the updater needs to know about a file's dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampResolution {
    /// The chosen timestamp
    pub resolved: ResolvedTimestamp,
    /// The single filesystem-derived candidate, before filtering
    pub filesystem_time: DateTime<Local>,
    /// The embedded candidate, if one was found
    pub embedded_time: Option<DateTime<Local>>,
}

/// The filesystem candidate: created, else modified, else accessed
pub fn filesystem_time(record: &FileRecord) -> DateTime<Local> {
    [record.created, record.modified]
        .into_iter()
        .find(|&time| is_set(time))
        .unwrap_or(record.accessed)
}

/// Resolve the sort timestamp for `record`
pub fn resolve(record: &FileRecord, reader: &dyn MetadataReader) -> TimestampResolution {
    let filesystem_time = filesystem_time(record);

    let embedded_time = if record.is_media {
        match reader.read(&record.path) {
            Ok(metadata) => metadata.timestamp(),
            Err(error) => {
                tracing::debug!(%error, "no embedded metadata");
                None
            }
        }
    } else {
        None
    };

    let resolved = [Some(filesystem_time), embedded_time]
        .into_iter()
        .flatten()
        .filter(|&time| is_set(time))
        .min()
        .map_or(ResolvedTimestamp::Unknown, ResolvedTimestamp::Known);

    TimestampResolution {
        resolved,
        filesystem_time,
        embedded_time,
    }
}
