//! Moving a single file, with or without clobbering.

use crate::error::RelocateError;
use filetime::FileTime;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::Path;

/// Move `source` to `destination`.
///
/// Without `overwrite`, an existing destination is a
/// [`RelocateError::Collision`] and nothing is touched. Moves across
/// filesystems fall back to copy, size check, delete.
pub fn move_file(source: &Path, destination: &Path, overwrite: bool) -> Result<(), RelocateError> {
    let result = if overwrite {
        fs::rename(source, destination).or_else(|_| copy_then_delete(source, destination, true))
    } else {
        move_no_clobber(source, destination)
    };

    result.map_err(|source_err| {
        if source_err.kind() == ErrorKind::AlreadyExists {
            RelocateError::Collision {
                destination: destination.to_path_buf(),
            }
        } else {
            RelocateError::Move {
                from: source.to_path_buf(),
                to: destination.to_path_buf(),
                source: source_err,
            }
        }
    })
}

/// Hard link fails atomically when the destination exists, unlike rename
fn move_no_clobber(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::hard_link(source, destination) {
        Ok(()) => fs::remove_file(source).map_err(|e| source_left_behind(destination, e)),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(e),
        Err(_) => copy_then_delete(source, destination, false),
    }
}

/// The destination already holds the file; only the source removal failed
fn source_left_behind(destination: &Path, err: io::Error) -> io::Error {
    io::Error::new(
        err.kind(),
        format!(
            "copied to {} but the original could not be removed: {}",
            destination.display(),
            err
        ),
    )
}

fn copy_then_delete(source: &Path, destination: &Path, overwrite: bool) -> io::Result<()> {
    let metadata = fs::metadata(source)?;

    let mut target = if overwrite {
        File::create(destination)?
    } else {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)?
    };

    let copied = io::copy(&mut File::open(source)?, &mut target).and_then(|n| {
        target.sync_all()?;
        Ok(n)
    });
    drop(target);

    match copied {
        Ok(bytes) if bytes == metadata.len() => {}
        Ok(bytes) => {
            let _ = fs::remove_file(destination);
            return Err(io::Error::other(format!(
                "Copy verification failed: source {} bytes, dest {} bytes",
                metadata.len(),
                bytes
            )));
        }
        Err(e) => {
            let _ = fs::remove_file(destination);
            return Err(e);
        }
    }

    // a copy gets a fresh mtime; keep the original one
    filetime::set_file_mtime(destination, FileTime::from_last_modification_time(&metadata))?;
    fs::remove_file(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(path: &Path, content: &[u8]) {
        File::create(path).unwrap().write_all(content).unwrap();
    }

    #[test]
    fn moves_into_empty_slot() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.jpg");
        let dest = temp.path().join("b.jpg");
        write(&src, b"photo");

        move_file(&src, &dest, false).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"photo");
    }

    #[test]
    fn collision_without_overwrite_keeps_both_files() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.jpg");
        let dest = temp.path().join("b.jpg");
        write(&src, b"new");
        write(&dest, b"old");

        let err = move_file(&src, &dest, false).unwrap_err();

        assert!(matches!(err, RelocateError::Collision { .. }));
        assert_eq!(fs::read(&src).unwrap(), b"new");
        assert_eq!(fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn overwrite_replaces_destination() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.jpg");
        let dest = temp.path().join("b.jpg");
        write(&src, b"new");
        write(&dest, b"old");

        move_file(&src, &dest, true).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn moving_onto_itself_is_a_collision() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.jpg");
        write(&src, b"photo");

        let err = move_file(&src, &src, false).unwrap_err();

        assert!(matches!(err, RelocateError::Collision { .. }));
        assert!(src.exists());
    }

    #[test]
    fn copy_fallback_preserves_mtime() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.jpg");
        let dest = temp.path().join("b.jpg");
        write(&src, b"photo");
        let mtime = FileTime::from_unix_time(1_262_304_000, 0);
        filetime::set_file_mtime(&src, mtime).unwrap();

        copy_then_delete(&src, &dest, false).unwrap();

        assert!(!src.exists());
        let meta = fs::metadata(&dest).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), mtime);
    }

    #[test]
    fn leftover_source_error_names_the_destination() {
        let err = source_left_behind(
            Path::new("/out/2024/01 January/a.jpg"),
            io::Error::from(ErrorKind::PermissionDenied),
        );

        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        let message = err.to_string();
        assert!(message.starts_with("copied to /out/2024/01 January/a.jpg"));
        assert!(message.contains("original could not be removed"));
    }

    #[test]
    fn missing_source_is_a_move_error() {
        let temp = TempDir::new().unwrap();
        let err = move_file(
            &temp.path().join("gone.jpg"),
            &temp.path().join("b.jpg"),
            false,
        )
        .unwrap_err();

        assert!(matches!(err, RelocateError::Move { .. }));
    }
}
