//! # file-sorter CLI
//!
//! Command-line interface for the file sorter.
//!
//! ## Usage
//! ```bash
//! file-sorter -i ~/Dump -o ~/Photos --pictures
//! file-sorter -i ~/Dump --pictures --update-timestamp --no-move --recurse
//! ```

mod cli;

use file_sorter::Result;

fn main() -> Result<()> {
    file_sorter::init_tracing();
    cli::run()
}
