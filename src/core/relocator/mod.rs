//! File relocation and metadata correction.
//!
//! Given a resolved timestamp, optionally rewrites the file's filesystem and
//! embedded times, then moves it to `<output>/<YYYY>/<MM Month>`. Files with
//! no resolvable timestamp go to `<output>/Unsorted`.

mod mover;
mod placement;
mod types;
mod updater;

pub use mover::move_file;
pub use placement::{Placement, UNSORTED_FOLDER};
pub use types::*;
pub use updater::{day_difference, FileUpdater};
