//! Event channel implementation using crossbeam-channel.
//!
//! Workers on the rayon pool send whole events; a single consumer renders
//! them, so console lines never interleave.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::{Event, FileEvent};

/// Sends events from the sorting pipeline.
///
/// Cheap to clone; every worker holds its own copy.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// If the receiver is dropped, the event is silently discarded.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }

    /// Send a per-file event
    pub fn file(&self, event: FileEvent) {
        self.send(Event::File(event));
    }
}

/// Receives events from the sorting pipeline.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Iterate until every sender has been dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }

    /// Drain whatever is queued right now
    pub fn drain(&self) -> Vec<Event> {
        self.inner.try_iter().collect()
    }
}

/// Channel between the pipeline and whoever renders progress.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender whose receiver is already gone, for runs without a UI.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RunEvent;
    use std::path::PathBuf;
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.file(FileEvent::Moving {
                path: PathBuf::from("/dump/a.jpg"),
                placement: "2024/01 January".to_string(),
            });
        });

        handle.join().unwrap();

        match receiver.iter().next().unwrap() {
            Event::File(FileEvent::Moving { placement, .. }) => {
                assert_eq!(placement, "2024/01 January");
            }
            _ => panic!("Wrong event type"),
        };
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Run(RunEvent::Started {
            total_files: 0,
            dry_run: true,
        }));
    }

    #[test]
    fn drain_returns_queued_events_in_order() {
        let (sender, receiver) = EventChannel::new();
        for total_files in 0..3 {
            sender.send(Event::Run(RunEvent::Started {
                total_files,
                dry_run: false,
            }));
        }

        let drained = receiver.drain();
        assert_eq!(drained.len(), 3);
        assert!(matches!(
            drained[2],
            Event::Run(RunEvent::Started { total_files: 2, .. })
        ));
        assert!(receiver.drain().is_empty());
    }
}
