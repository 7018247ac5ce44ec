//! Pipeline execution implementation.

use crate::core::metadata::{
    ExifMetadataReader, ExifMetadataWriter, MetadataReader, MetadataWriter,
};
use crate::core::relocator::{FileUpdater, OperationOutcome, SortConfig};
use crate::core::resolver::resolve;
use crate::core::scanner::{DirectoryScanner, FileRecord, ScanConfig, ScanResult};
use crate::core::tagging::{describe, TaggingService};
use crate::error::{SorterError, TagError};
use crate::events::{null_sender, Event, EventSender, FileEvent, RunEvent, RunSummary};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Directory holding the files to sort
    pub input: PathBuf,
    /// Scanner configuration
    pub scan: ScanConfig,
    /// What to do with each file
    pub sort: SortConfig,
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    reader: Option<Box<dyn MetadataReader>>,
    writer: Option<Box<dyn MetadataWriter>>,
    tagger: Option<Box<dyn TaggingService>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            reader: None,
            writer: None,
            tagger: None,
        }
    }

    /// Directory to sort
    pub fn input(mut self, input: PathBuf) -> Self {
        self.config.input = input;
        self
    }

    /// Root of the year/month tree
    pub fn output(mut self, output: PathBuf) -> Self {
        self.config.sort.output_root = output;
        self
    }

    /// Read embedded metadata from media files
    pub fn pictures(mut self, pictures: bool) -> Self {
        self.config.scan.pictures = pictures;
        self
    }

    /// Scan subdirectories; also disables relocation
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.scan.recursive = recursive;
        self.config.sort.recursive = recursive;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan.include_hidden = include;
        self
    }

    /// Report without mutating anything
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.sort.dry_run = dry_run;
        self
    }

    /// Replace existing files at the destination
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.sort.overwrite = overwrite;
        self
    }

    /// Correct filesystem and embedded times
    pub fn update_timestamps(mut self, update: bool) -> Self {
        self.config.sort.update_timestamps = update;
        self
    }

    /// Largest filesystem-time correction allowed, in days
    pub fn max_adjustment_days(mut self, days: u32) -> Self {
        self.config.sort.max_adjustment_days = days;
        self
    }

    /// Leave files in place
    pub fn no_move(mut self, no_move: bool) -> Self {
        self.config.sort.no_move = no_move;
        self
    }

    /// Override the embedded metadata reader
    pub fn reader(mut self, reader: Box<dyn MetadataReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Override the embedded metadata writer
    pub fn writer(mut self, writer: Box<dyn MetadataWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Send media files to this service for tagging
    pub fn tagger(mut self, tagger: Box<dyn TaggingService>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Result<Pipeline, SorterError> {
        let sort = &self.config.sort;
        if sort.recursive && !sort.no_move {
            return Err(SorterError::Config(
                "Recurse is only available if NoMove is also true".to_string(),
            ));
        }
        if sort.dry_run && sort.overwrite {
            return Err(SorterError::Config(
                "WhatIf and Force cannot both be true".to_string(),
            ));
        }

        Ok(Pipeline {
            config: self.config,
            reader: self.reader.unwrap_or_else(|| Box::new(ExifMetadataReader)),
            writer: self.writer.unwrap_or_else(|| Box::new(ExifMetadataWriter)),
            tagger: self.tagger,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The sorting pipeline: scan, then resolve/correct/relocate every file in parallel
pub struct Pipeline {
    config: PipelineConfig,
    reader: Box<dyn MetadataReader>,
    writer: Box<dyn MetadataWriter>,
    tagger: Option<Box<dyn TaggingService>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<RunSummary, SorterError> {
        self.run_with_events(&null_sender())
    }

    /// Scan and process everything, reporting through `events`
    pub fn run_with_events(&self, events: &EventSender) -> Result<RunSummary, SorterError> {
        let scanned = self.scan(events)?;
        Ok(self.process(&scanned.files, events))
    }

    /// Enumerate the input directory
    pub fn scan(&self, events: &EventSender) -> Result<ScanResult, SorterError> {
        let scanner = DirectoryScanner::new(self.config.scan.clone());
        Ok(scanner.scan_with_events(&self.config.input, events)?)
    }

    /// Process `files` in parallel; one file's failure never stops the others
    pub fn process(&self, files: &[FileRecord], events: &EventSender) -> RunSummary {
        let start_time = Instant::now();

        events.send(Event::Run(RunEvent::Started {
            total_files: files.len(),
            dry_run: self.config.sort.dry_run,
        }));

        let outcomes: Vec<OperationOutcome> = files
            .par_iter()
            .map(|record| self.process_file(record, events))
            .collect();

        let mut summary = RunSummary {
            total_files: files.len(),
            dry_run: self.config.sort.dry_run,
            ..Default::default()
        };
        for outcome in &outcomes {
            summary.record(outcome);
        }
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        events.send(Event::Run(RunEvent::Completed {
            summary: summary.clone(),
        }));

        summary
    }

    /// Resolve, tag, correct and relocate a single file
    pub fn process_file(&self, scanned: &FileRecord, events: &EventSender) -> OperationOutcome {
        let outcome = match FileRecord::from_path(&scanned.path, scanned.is_media) {
            Ok(record) => {
                let resolution = resolve(&record, self.reader.as_ref());
                tracing::debug!(
                    path = %record.path.display(),
                    resolved = %resolution.resolved,
                    "resolved timestamp"
                );

                if record.is_media {
                    self.tag_file(&record, events);
                }

                let updater = FileUpdater::new(&self.config.sort, self.writer.as_ref(), events);
                updater
                    .apply(&record, &resolution)
                    .unwrap_or_else(|e| OperationOutcome::Error {
                        reason: e.to_string(),
                    })
            }
            Err(e) => OperationOutcome::Error {
                reason: e.to_string(),
            },
        };

        if let OperationOutcome::Error { reason } = &outcome {
            tracing::warn!(path = %scanned.path.display(), %reason, "file failed");
        }

        events.file(FileEvent::Completed {
            path: scanned.path.clone(),
            outcome: outcome.clone(),
        });

        outcome
    }

    fn tag_file(&self, record: &FileRecord, events: &EventSender) {
        let Some(tagger) = &self.tagger else {
            return;
        };

        let description = self
            .reader
            .read(&record.path)
            .map(|metadata| describe(&metadata))
            .unwrap_or_default();

        events.file(FileEvent::Tagging {
            path: record.path.clone(),
            description: description.clone(),
        });

        match tagger.tag(&record.path, &description) {
            Ok(tags) => events.file(FileEvent::Tagged {
                path: record.path.clone(),
                tags,
            }),
            Err(error) => {
                let message = match &error {
                    TagError::InvalidPayload { path } => {
                        format!("{} is not valid for tagging. Skipping.", path.display())
                    }
                    other => other.to_string(),
                };
                events.file(FileEvent::TagSkipped {
                    path: record.path.clone(),
                    message,
                });
            }
        }
    }
}
