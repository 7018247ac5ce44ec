//! Directory walking implementation using walkdir.

use super::{filter::MediaFilter, FileRecord, ScanResult};
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Mark media files so their embedded metadata is read
    pub pictures: bool,
}

/// Scanner implementation using the walkdir crate
pub struct DirectoryScanner {
    config: ScanConfig,
    filter: MediaFilter,
}

impl DirectoryScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = MediaFilter::new().with_hidden(config.include_hidden);
        Self { config, filter }
    }

    /// Lazily enumerate the files under `root`
    pub fn entries<'a>(
        &'a self,
        root: &Path,
    ) -> impl Iterator<Item = Result<FileRecord, ScanError>> + 'a {
        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let include_hidden = self.config.include_hidden;

        WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(move |entry| include_hidden || !is_hidden_dir(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() || !self.filter.is_visible(entry.path()) {
                        return None;
                    }
                    Some(self.record(entry.path()))
                }
                Err(e) => Some(Err(walk_error(e))),
            })
    }

    /// Enumerate everything under `root`
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(root, &null_sender())
    }

    /// Enumerate everything under `root`, reporting unreadable entries
    pub fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            path: root.to_path_buf(),
            recursive: self.config.recursive,
        }));

        let mut files = Vec::new();
        let mut errors = Vec::new();

        for entry in self.entries(root) {
            match entry {
                Ok(record) => files.push(record),
                Err(error) => {
                    tracing::debug!(%error, "skipping unreadable entry");
                    events.send(Event::Scan(ScanEvent::Error {
                        path: error_path(&error),
                        message: error.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_files: files.len(),
        }));

        Ok(ScanResult { files, errors })
    }

    fn record(&self, path: &Path) -> Result<FileRecord, ScanError> {
        let is_media = self.config.pictures && self.filter.is_media(path);
        FileRecord::from_path(path, is_media).map_err(|source| ScanError::ReadDirectory {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

fn walk_error(e: walkdir::Error) -> ScanError {
    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
    if e.io_error().map(|e| e.kind()) == Some(std::io::ErrorKind::PermissionDenied) {
        ScanError::PermissionDenied { path }
    } else {
        ScanError::ReadDirectory {
            path,
            source: std::io::Error::other(e.to_string()),
        }
    }
}

fn error_path(error: &ScanError) -> PathBuf {
    match error {
        ScanError::DirectoryNotFound { path }
        | ScanError::PermissionDenied { path }
        | ScanError::ReadDirectory { path, .. } => path.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_nothing() {
        let temp = TempDir::new().unwrap();
        let result = DirectoryScanner::new(ScanConfig::default())
            .scan(temp.path())
            .unwrap();

        assert!(result.files.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_lists_every_file_not_just_media() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "photo.jpg");
        touch(temp.path(), "notes.txt");

        let result = DirectoryScanner::new(ScanConfig::default())
            .scan(temp.path())
            .unwrap();

        assert_eq!(result.files.len(), 2);
    }

    #[test]
    fn media_flag_requires_pictures_mode() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "photo.JPG");
        touch(temp.path(), "notes.txt");

        let plain = DirectoryScanner::new(ScanConfig::default())
            .scan(temp.path())
            .unwrap();
        assert!(plain.files.iter().all(|f| !f.is_media));

        let pictures = DirectoryScanner::new(ScanConfig {
            pictures: true,
            ..Default::default()
        })
        .scan(temp.path())
        .unwrap();
        let photo = pictures
            .files
            .iter()
            .find(|f| f.path.ends_with("photo.JPG"))
            .unwrap();
        let notes = pictures
            .files
            .iter()
            .find(|f| f.path.ends_with("notes.txt"))
            .unwrap();
        assert!(photo.is_media);
        assert!(!notes.is_media);
    }

    #[test]
    fn subdirectories_only_when_recursive() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "top.jpg");
        let nested = temp.path().join("2019");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "nested.jpg");

        let flat = DirectoryScanner::new(ScanConfig::default())
            .scan(temp.path())
            .unwrap();
        assert_eq!(flat.files.len(), 1);

        let deep = DirectoryScanner::new(ScanConfig {
            recursive: true,
            ..Default::default()
        })
        .scan(temp.path())
        .unwrap();
        assert_eq!(deep.files.len(), 2);
    }

    #[test]
    fn hidden_files_and_directories_are_skipped_by_default() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "visible.jpg");
        touch(temp.path(), ".hidden.jpg");
        let hidden_dir = temp.path().join(".thumbnails");
        fs::create_dir(&hidden_dir).unwrap();
        touch(&hidden_dir, "thumb.jpg");

        let config = ScanConfig {
            recursive: true,
            ..Default::default()
        };
        let result = DirectoryScanner::new(config.clone())
            .scan(temp.path())
            .unwrap();
        assert_eq!(result.files.len(), 1);

        let with_hidden = DirectoryScanner::new(ScanConfig {
            include_hidden: true,
            ..config
        })
        .scan(temp.path())
        .unwrap();
        assert_eq!(with_hidden.files.len(), 3);
    }

    #[test]
    fn scan_nonexistent_directory_is_an_error() {
        let result = DirectoryScanner::new(ScanConfig::default())
            .scan(Path::new("/nonexistent/path/12345"));
        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }
}
