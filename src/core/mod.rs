//! # Core Module
//!
//! The UI-agnostic sorting engine.
//!
//! ## Modules
//! - `scanner` - Enumerates input files and their filesystem times
//! - `metadata` - Reads and writes embedded EXIF data
//! - `resolver` - Picks the canonical timestamp for a file
//! - `relocator` - Corrects timestamps and moves files into place
//! - `tagging` - Optional remote image tagging
//! - `pipeline` - Runs everything in parallel

pub mod metadata;
pub mod pipeline;
pub mod relocator;
pub mod resolver;
pub mod scanner;
pub mod tagging;

// Re-export commonly used types
pub use metadata::EmbeddedMetadata;
pub use pipeline::Pipeline;
pub use relocator::{OperationOutcome, Placement, SortConfig};
pub use resolver::{ResolvedTimestamp, TimestampResolution};
pub use scanner::FileRecord;
