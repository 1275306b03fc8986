//! Eager fallback port: used when the host lacks visibility sensing.

use crossbeam_channel::Sender;

use super::ViewportPort;
use crate::actor::{VisibilityEvent, WorkerMessage};
use crate::media::{ItemId, TrackedItem};

/// Port that reports every observed item visible immediately.
///
/// This trades all laziness for correctness: with no way to sense the
/// viewport, loading everything is the only behavior that guarantees
/// content eventually appears.
#[derive(Debug)]
pub struct EagerPort {
    events: Sender<WorkerMessage>,
    connected: bool,
}

impl EagerPort {
    /// Create the fallback port.
    pub const fn new(events: Sender<WorkerMessage>) -> Self {
        Self {
            events,
            connected: true,
        }
    }
}

impl ViewportPort for EagerPort {
    fn observe(&mut self, item: &TrackedItem) {
        if !self.connected {
            return;
        }
        let _ = self.events.send(WorkerMessage::Visibility(VisibilityEvent {
            item: item.id().clone(),
            visible: true,
        }));
    }

    fn unobserve(&mut self, _item: &ItemId) {
        // Nothing is actually watched; firing already happened at observe.
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}
