//! Timestamp correction and relocation for one file.

use super::mover::move_file;
use super::placement::Placement;
use super::types::{CorrectionReport, OperationOutcome, SkipReason, SortConfig};
use crate::core::metadata::{DateSlot, MetadataWriter};
use crate::core::resolver::TimestampResolution;
use crate::core::scanner::FileRecord;
use crate::error::RelocateError;
use crate::events::{EventSender, FileEvent};
use chrono::{DateTime, Local};
use filetime::FileTime;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Applies a [`TimestampResolution`] to a file on disk
pub struct FileUpdater<'a> {
    config: &'a SortConfig,
    writer: &'a dyn MetadataWriter,
    events: &'a EventSender,
}

impl<'a> FileUpdater<'a> {
    pub fn new(
        config: &'a SortConfig,
        writer: &'a dyn MetadataWriter,
        events: &'a EventSender,
    ) -> Self {
        Self {
            config,
            writer,
            events,
        }
    }

    /// Correct timestamps, then relocate
    pub fn apply(
        &self,
        record: &FileRecord,
        resolution: &TimestampResolution,
    ) -> Result<OperationOutcome, RelocateError> {
        let correction = self.correct_timestamps(record, resolution)?;

        if !self.config.moves_files() {
            let reason = if self.config.no_move {
                SkipReason::NoMove
            } else {
                SkipReason::Recursive
            };
            return Ok(self.stayed(reason, &correction));
        }

        self.relocate(record, resolution)
    }

    fn stayed(&self, reason: SkipReason, correction: &CorrectionReport) -> OperationOutcome {
        if correction.changed_anything() {
            OperationOutcome::TimestampsUpdated
        } else {
            OperationOutcome::Skipped { reason }
        }
    }

    /// Rewrite filesystem and embedded times to the resolved timestamp
    pub fn correct_timestamps(
        &self,
        record: &FileRecord,
        resolution: &TimestampResolution,
    ) -> Result<CorrectionReport, RelocateError> {
        let mut report = CorrectionReport::default();

        if !self.config.update_timestamps || !record.is_media {
            return Ok(report);
        }
        let Some(resolved) = resolution.resolved.known() else {
            return Ok(report);
        };

        let mut retime = false;
        if resolution.filesystem_time != resolved {
            let days = day_difference(resolution.filesystem_time, resolved);
            if days > f64::from(self.config.max_adjustment_days) {
                tracing::warn!(
                    path = %record.path.display(),
                    days,
                    "correction exceeds limit, leaving filesystem times alone"
                );
                self.events.file(FileEvent::AdjustmentTooLarge {
                    path: record.path.clone(),
                    file_time: resolution.filesystem_time,
                    resolved,
                    days,
                });
                report.adjustment_too_large = true;
            } else {
                self.events.file(FileEvent::TimestampUpdate {
                    path: record.path.clone(),
                    to: resolved,
                });
                report.filesystem_updated = true;
                retime = !self.config.dry_run;
            }
        }

        if resolution.embedded_time != Some(resolved) {
            self.events.file(FileEvent::EmbeddedUpdate {
                path: record.path.clone(),
                to: resolved,
            });
            // rewriting the EXIF block bumps the mtime
            let original_mtime = fs::metadata(&record.path)
                .ok()
                .map(|m| FileTime::from_last_modification_time(&m));

            report.embedded_slots_written = self.write_embedded(&record.path, resolved);

            if !retime && !self.config.dry_run && report.embedded_slots_written > 0 {
                if let Some(mtime) = original_mtime {
                    filetime::set_file_mtime(&record.path, mtime).map_err(|source| {
                        RelocateError::SetTimes {
                            path: record.path.clone(),
                            source,
                        }
                    })?;
                }
            }
        }

        // last, so nothing written above can disturb it
        if retime {
            set_file_times(&record.path, resolved)?;
        }

        Ok(report)
    }

    /// Each slot is attempted independently; failures are warnings
    fn write_embedded(&self, path: &Path, resolved: DateTime<Local>) -> usize {
        if self.config.dry_run {
            if self.writer.supports(path) {
                return DateSlot::ALL.len();
            }
            for slot in DateSlot::ALL {
                self.write_failed(path, slot, "file cannot hold embedded dates".to_string());
            }
            return 0;
        }

        let mut written = 0;
        for slot in DateSlot::ALL {
            match self.writer.write_date(path, slot, resolved) {
                Ok(()) => written += 1,
                Err(error) => {
                    tracing::debug!(%error, "embedded write failed");
                    self.write_failed(path, slot, error.to_string());
                }
            }
        }
        written
    }

    fn write_failed(&self, path: &Path, slot: DateSlot, message: String) {
        self.events.file(FileEvent::MetadataWriteFailed {
            path: path.to_path_buf(),
            field: slot.to_string(),
            message,
        });
    }

    /// Move the file under `<output>/<placement>`
    pub fn relocate(
        &self,
        record: &FileRecord,
        resolution: &TimestampResolution,
    ) -> Result<OperationOutcome, RelocateError> {
        let placement = Placement::for_timestamp(resolution.resolved);
        let folder = self.config.output_root.join(placement.relative_path());
        let destination = folder.join(record.path.file_name().unwrap_or_default());

        self.events.file(FileEvent::Moving {
            path: record.path.clone(),
            placement: placement.to_string(),
        });

        if self.config.dry_run {
            if !self.config.overwrite && destination.exists() {
                return Err(RelocateError::Collision { destination });
            }
        } else {
            fs::create_dir_all(&folder).map_err(|source| RelocateError::CreateDir {
                path: folder.clone(),
                source,
            })?;
            move_file(&record.path, &destination, self.config.overwrite)?;
        }

        Ok(OperationOutcome::Moved { destination })
    }
}

/// Absolute difference in fractional days
pub fn day_difference(a: DateTime<Local>, b: DateTime<Local>) -> f64 {
    (a - b).num_milliseconds().abs() as f64 / MILLIS_PER_DAY
}

fn set_file_times(path: &Path, time: DateTime<Local>) -> Result<(), RelocateError> {
    let system_time = SystemTime::from(time);
    let set_times_error = |source| RelocateError::SetTimes {
        path: path.to_path_buf(),
        source,
    };

    filetime::set_file_mtime(path, FileTime::from_system_time(system_time))
        .map_err(set_times_error)?;

    #[cfg(windows)]
    {
        use std::os::windows::fs::FileTimesExt;
        let file = fs::OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(set_times_error)?;
        file.set_times(fs::FileTimes::new().set_created(system_time))
            .map_err(set_times_error)?;
    }

    Ok(())
}
