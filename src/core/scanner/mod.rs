//! # Scanner Module
//!
//! Enumerates the files to sort and captures their filesystem times.
//!
//! Only regular files are returned. Without `recursive` only the top level
//! of the input directory is listed.
//!
//! ## Example
//! ```rust,ignore
//! use file_sorter::core::scanner::{DirectoryScanner, ScanConfig};
//!
//! let scanner = DirectoryScanner::new(ScanConfig::default());
//! let result = scanner.scan(Path::new("/Users/me/Dump"))?;
//! ```

mod filter;
mod walker;

pub use filter::MediaFilter;
pub use walker::{DirectoryScanner, ScanConfig};

use crate::core::resolver::epoch_floor;
use crate::error::ScanError;
use chrono::{DateTime, Local};
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One file to process, read fresh from the filesystem
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Creation time, or the epoch floor when the platform has none
    pub created: DateTime<Local>,
    /// Last write time
    pub modified: DateTime<Local>,
    /// Last access time
    pub accessed: DateTime<Local>,
    /// Whether embedded metadata should be consulted
    pub is_media: bool,
}

impl FileRecord {
    /// Read a record for `path` from the filesystem
    pub fn from_path(path: &Path, is_media: bool) -> io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let path = std::path::absolute(path)?;
        Ok(Self::from_metadata(path, &metadata, is_media))
    }

    /// Build a record from already-fetched metadata
    pub fn from_metadata(path: PathBuf, metadata: &Metadata, is_media: bool) -> Self {
        Self {
            path,
            created: to_local(metadata.created()),
            modified: to_local(metadata.modified()),
            accessed: to_local(metadata.accessed()),
            is_media,
        }
    }
}

fn to_local(time: io::Result<SystemTime>) -> DateTime<Local> {
    time.map(DateTime::<Local>::from)
        .unwrap_or_else(|_| epoch_floor())
}

/// Result of a scan
#[derive(Debug)]
pub struct ScanResult {
    /// Files found
    pub files: Vec<FileRecord>,
    /// Entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn record_reads_filesystem_times() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.jpg");
        File::create(&path).unwrap();

        let mtime = filetime::FileTime::from_unix_time(1_500_000_000, 0);
        filetime::set_file_mtime(&path, mtime).unwrap();

        let record = FileRecord::from_path(&path, true).unwrap();
        assert!(record.path.is_absolute());
        assert!(record.is_media);
        assert_eq!(record.modified.timestamp(), 1_500_000_000);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(FileRecord::from_path(Path::new("/nonexistent/a.jpg"), false).is_err());
    }

    #[test]
    fn unavailable_time_becomes_floor() {
        let unsupported = Err(io::Error::new(io::ErrorKind::Unsupported, "no btime"));
        assert_eq!(to_local(unsupported), epoch_floor());
    }
}
