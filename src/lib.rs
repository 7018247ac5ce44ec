//! # File Sorter
//!
//! Sorts a dump of photos and files into `<year>/<MM Month>` folders using
//! the best available timestamp for each file.
//!
//! ## Core Philosophy
//! - **Earliest plausible date wins** - filesystem times get reset by copies,
//!   capture dates do not
//! - **Never abort on one bad file** - every file succeeds or fails alone
//! - **Dry run is honest** - `--whatif` reports exactly what a real run would do
//!
//! ## Architecture
//! - `core` - Timestamp resolution, relocation and the parallel pipeline
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, SorterError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    // A subscriber may already be installed (e.g. by a test harness)
    let _ = tracing::subscriber::set_global_default(subscriber);
}
