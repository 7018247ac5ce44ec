//! # Pipeline Module
//!
//! Orchestrates a sorting run:
//! 1. Scan the input directory
//! 2. For each file, in parallel: resolve its timestamp, optionally tag it,
//!    correct its timestamps and move it
//! 3. Summarize the outcomes
//!
//! Workers share nothing but the event channel.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig};
