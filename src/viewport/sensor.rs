//! Sensor-backed port: a dedicated thread polling the host's visibility
//! sensing capability.
//!
//! The host supplies a [`ViewportSensor`] (wrapping whatever native
//! intersection machinery it has); this port arms it with the resolved
//! margin and threshold, polls it without blocking anything else, and
//! forwards qualifying readings to the load worker as visibility events.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

use super::ViewportPort;
use crate::actor::{VisibilityEvent, WorkerMessage};
use crate::config::EngineConfig;
use crate::media::{ItemId, TrackedItem};

/// How long one sensor poll may block before the thread re-checks its
/// command queue and shutdown flag.
const POLL_TIMEOUT: Duration = Duration::from_millis(10);

/// One observation from the host's sensing machinery.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// The item the reading is about.
    pub item: ItemId,
    /// Fraction of the item inside the sensing box, `0.0..=1.0`.
    pub ratio: f32,
}

/// Host capability that senses item visibility.
///
/// `Send` because the port owns it on its polling thread. Implementations
/// are expected to honor the margin passed to [`ViewportSensor::arm`] by
/// expanding (or, for negative margins, shrinking) their sensing box.
pub trait ViewportSensor: Send {
    /// Configure the sensing box once, before any watching starts.
    fn arm(&mut self, margin_px: f32, threshold: f32);

    /// Start producing readings for an item.
    fn watch(&mut self, item: ItemId);

    /// Stop producing readings for an item.
    fn unwatch(&mut self, item: &ItemId);

    /// Wait up to `timeout` for the next reading.
    fn poll(&mut self, timeout: Duration) -> Option<SensorReading>;
}

/// Commands from the port handle to its polling thread.
enum SensorCommand {
    Watch(ItemId),
    Unwatch(ItemId),
}

/// The native visibility adapter.
pub struct SensorPort {
    /// Handle to the polling thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Command channel into the polling thread.
    commands: Sender<SensorCommand>,
}

impl SensorPort {
    /// Spawn the polling thread over a host sensor.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the thread.
    pub fn spawn(
        sensor: Box<dyn ViewportSensor>,
        config: &EngineConfig,
        events: Sender<WorkerMessage>,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);
        let (command_tx, command_rx) = bounded::<SensorCommand>(64);

        let margin_px = config.margin_px;
        let threshold = config.threshold;
        let trigger_once = config.trigger_once;

        let handle = thread::Builder::new()
            .name("lightbox-sensor".to_string())
            .spawn(move || {
                Self::run_loop(
                    sensor,
                    &command_rx,
                    &events,
                    &shutdown_clone,
                    margin_px,
                    threshold,
                    trigger_once,
                );
            })
            .expect("Failed to spawn sensor thread");

        Self {
            handle: Some(handle),
            shutdown,
            commands: command_tx,
        }
    }

    /// Main polling loop.
    fn run_loop(
        mut sensor: Box<dyn ViewportSensor>,
        commands: &Receiver<SensorCommand>,
        events: &Sender<WorkerMessage>,
        shutdown: &Arc<AtomicBool>,
        margin_px: f32,
        threshold: f32,
        trigger_once: bool,
    ) {
        sensor.arm(margin_px, threshold);

        // Items that already fired under trigger_once semantics; they are
        // unwatched and must never fire again, even if re-observed.
        let mut fired: HashSet<ItemId> = HashSet::new();

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            // Apply pending watch/unwatch requests first.
            loop {
                match commands.try_recv() {
                    Ok(SensorCommand::Watch(item)) => {
                        if !(trigger_once && fired.contains(&item)) {
                            sensor.watch(item);
                        }
                    }
                    Ok(SensorCommand::Unwatch(item)) => sensor.unwatch(&item),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            let Some(reading) = sensor.poll(POLL_TIMEOUT) else {
                continue;
            };

            let crossed = reading.ratio >= threshold;
            if trigger_once {
                if !crossed {
                    continue;
                }
                if !fired.insert(reading.item.clone()) {
                    continue;
                }
                sensor.unwatch(&reading.item);
            }

            let event = VisibilityEvent {
                item: reading.item,
                visible: crossed,
            };
            if events.send(WorkerMessage::Visibility(event)).is_err() {
                // Worker gone; nothing left to sense for.
                break;
            }
        }
    }
}

impl ViewportPort for SensorPort {
    fn observe(&mut self, item: &TrackedItem) {
        let _ = self.commands.send(SensorCommand::Watch(item.id().clone()));
    }

    fn unobserve(&mut self, item: &ItemId) {
        let _ = self.commands.send(SensorCommand::Unwatch(item.clone()));
    }

    fn disconnect(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SensorPort {
    fn drop(&mut self) {
        self.disconnect();
    }
}
