//! # Events Module
//!
//! Progress reporting for the sorting pipeline.
//!
//! ## Design
//! The core emits events through a channel; the CLI is the only thing that
//! writes to the console. Every mutating step is announced before it runs
//! and finished by a `FileEvent::Completed` carrying the outcome.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::File(FileEvent::Completed { path, outcome }) = event {
//!             println!("{}: {:?}", path.display(), outcome);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
