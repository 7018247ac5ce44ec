//! # Error Module
//!
//! Error types for the file sorter.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-file errors stay per-file** - only configuration errors stop a run

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum SorterError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Relocation error: {0}")]
    Relocate(#[from] RelocateError),

    #[error("Tagging error: {0}")]
    Tag(#[from] TagError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while enumerating input files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors reading or writing embedded metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No readable metadata in {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Failed to write {field} to {path}: {reason}")]
    WriteFailed {
        path: PathBuf,
        field: String,
        reason: String,
    },
}

/// Errors that occur while moving a file or updating its timestamps
#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("{destination} already exists (use --force to overwrite)")]
    Collision { destination: PathBuf },

    #[error("Failed to create folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to set file times on {path}: {source}")]
    SetTimes {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the remote tagging service
#[derive(Error, Debug)]
pub enum TagError {
    #[error("{path} is not valid for tagging")]
    InvalidPayload { path: PathBuf },

    #[error("Failed to read image {path}: {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tagging request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Tagging service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Tagging service returned no content")]
    EmptyResponse,
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SorterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/dump"),
        };
        assert!(error.to_string().contains("/photos/dump"));
    }

    #[test]
    fn collision_error_suggests_force() {
        let error = RelocateError::Collision {
            destination: PathBuf::from("/out/2024/01 January/a.jpg"),
        };
        let message = error.to_string();
        assert!(message.contains("01 January/a.jpg"));
        assert!(message.contains("--force"));
    }

    #[test]
    fn metadata_write_error_names_field() {
        let error = MetadataError::WriteFailed {
            path: PathBuf::from("/photos/a.png"),
            field: "date taken".to_string(),
            reason: "unsupported".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("date taken"));
        assert!(message.contains("/photos/a.png"));
    }

    #[test]
    fn relocate_error_converts_to_top_level() {
        let error: SorterError = RelocateError::Collision {
            destination: PathBuf::from("/out/x.jpg"),
        }
        .into();
        assert!(error.to_string().starts_with("Relocation error"));
    }
}
