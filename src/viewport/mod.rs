//! Viewport visibility port: the seam between host visibility sensing and
//! the load worker.
//!
//! Callers depend only on [`ViewportPort`]. Two adapters exist:
//!
//! - [`SensorPort`] — wraps a host-provided [`ViewportSensor`] capability
//!   (the native path), polling it on a dedicated thread.
//! - [`EagerPort`] — the fallback when the host has no sensing: every
//!   observed item is reported visible immediately. Content always loads;
//!   only the laziness is lost.

mod eager;
mod sensor;

pub use eager::EagerPort;
pub use sensor::{SensorPort, SensorReading, ViewportSensor};

use crossbeam_channel::Sender;

use crate::actor::WorkerMessage;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::media::{ItemId, TrackedItem};

/// Abstraction over "tell me when this item is on screen".
///
/// `observe` registers an item for visibility callbacks (delivered to the
/// load worker as [`VisibilityEvent`](crate::actor::VisibilityEvent)s);
/// `unobserve` stops them for one item; `disconnect` stops them for all
/// items, permanently.
pub trait ViewportPort {
    /// Start watching an item.
    fn observe(&mut self, item: &TrackedItem);

    /// Stop watching one item.
    fn unobserve(&mut self, item: &ItemId);

    /// Stop watching everything and release sensing resources. After this
    /// returns no further visibility events are delivered.
    fn disconnect(&mut self);
}

/// Pick the port implementation for the host's capability.
///
/// `None` means the host environment cannot sense visibility
/// ([`EngineError::SensingUnavailable`]); the eager fallback preserves
/// correctness at the cost of loading everything up front.
pub(crate) fn select_port(
    sensor: Option<Box<dyn ViewportSensor>>,
    config: &EngineConfig,
    events: Sender<WorkerMessage>,
) -> Box<dyn ViewportPort> {
    match sensor {
        Some(sensor) => Box::new(SensorPort::spawn(sensor, config, events)),
        None => {
            log::warn!("{}", EngineError::SensingUnavailable);
            Box::new(EagerPort::new(events))
        }
    }
}
