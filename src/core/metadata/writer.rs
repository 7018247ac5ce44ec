//! EXIF date writing via little_exif.

use super::{DateSlot, MetadataWriter};
use crate::error::MetadataError;
use chrono::{DateTime, Local};
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Writes dates into the file's EXIF block, keeping every other tag
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadataWriter;

impl MetadataWriter for ExifMetadataWriter {
    fn write_date(
        &self,
        path: &Path,
        slot: DateSlot,
        time: DateTime<Local>,
    ) -> Result<(), MetadataError> {
        let failed = |reason: String| MetadataError::WriteFailed {
            path: path.to_path_buf(),
            field: slot.to_string(),
            reason,
        };

        let value = format_exif_datetime(time);
        let tag = match slot {
            DateSlot::DateTaken => ExifTag::DateTimeOriginal(value),
            DateSlot::DateEncoded => ExifTag::CreateDate(value),
        };

        // little_exif panics on some malformed containers
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut metadata = Metadata::new_from_path(path)?;
            metadata.set_tag(tag);
            metadata.write_to_file(path)
        }));

        match outcome {
            Ok(Ok(())) => {
                tracing::debug!(path = %path.display(), field = %slot, "embedded date written");
                Ok(())
            }
            Ok(Err(e)) => Err(failed(e.to_string())),
            Err(_) => Err(failed("metadata writer panicked".to_string())),
        }
    }

    /// Parses the container without writing anything back
    fn supports(&self, path: &Path) -> bool {
        matches!(
            panic::catch_unwind(AssertUnwindSafe(|| Metadata::new_from_path(path))),
            Ok(Ok(_))
        )
    }
}

pub(crate) fn format_exif_datetime(time: DateTime<Local>) -> String {
    time.format(EXIF_DATE_FORMAT).to_string()
}
