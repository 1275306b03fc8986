//! Engine: the public façade that ties ports, worker, and configuration
//! together.
//!
//! The engine is the entry point for hosts embedding the loader. It
//! resolves the adaptive configuration once at construction, picks the
//! visibility port for the host's sensing capability, spawns the load
//! worker, and exposes the outbound event stream the presentation layer
//! drains.

use std::collections::HashSet;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TryRecvError};

use super::messages::{EngineEvent, WorkerMessage};
use super::worker::LoadWorker;
use crate::config::{AdaptiveConfig, EngineConfig, LazyLoadOptions, NetworkClassProvider};
use crate::loader::ResourceLoader;
use crate::media::{ItemId, PreloadDescriptor, TrackedItem};
use crate::viewport::{select_port, ViewportPort, ViewportSensor};

/// The progressive loading engine.
///
/// All loading state lives on the worker thread; this handle only routes
/// messages. Failures never surface here — they are logged and reported
/// through [`EngineEvent::Failed`].
pub struct Engine {
    /// Effective configuration (adaptive defaults merged with options).
    config: EngineConfig,
    /// Visibility port (native sensing or eager fallback).
    port: Box<dyn ViewportPort>,
    /// Load worker handle.
    worker: Option<LoadWorker>,
    /// Message channel into the worker.
    worker_tx: Sender<WorkerMessage>,
    /// Outbound events for the host.
    event_rx: Receiver<EngineEvent>,
    /// Ids already registered, so re-scans only observe new items.
    tracked: HashSet<ItemId>,
    /// Whether `destroy()` has run.
    destroyed: bool,
}

impl Engine {
    /// Create an engine with default options.
    ///
    /// `sensor` is the host's visibility sensing capability; pass `None`
    /// when the environment has none and the engine will fall back to
    /// loading every observed item eagerly.
    pub fn new(
        loader: Box<dyn ResourceLoader>,
        sensor: Option<Box<dyn ViewportSensor>>,
        network: &dyn NetworkClassProvider,
    ) -> Self {
        Self::with_options(loader, sensor, network, &LazyLoadOptions::default())
    }

    /// Create an engine with explicit option overrides.
    pub fn with_options(
        loader: Box<dyn ResourceLoader>,
        sensor: Option<Box<dyn ViewportSensor>>,
        network: &dyn NetworkClassProvider,
        options: &LazyLoadOptions,
    ) -> Self {
        let class = network.network_class();
        let config = options.resolve(&AdaptiveConfig::resolve(class));
        log::debug!("engine configured for {class:?}: {config:?}");

        let (worker_tx, worker_rx) = bounded::<WorkerMessage>(64);
        // Unbounded on purpose: the host's drain cadence is unknown and a
        // full buffer here would wedge the worker mid-load.
        let (event_tx, event_rx) = unbounded::<EngineEvent>();

        let worker = LoadWorker::spawn(worker_rx, event_tx, loader, config.clone());
        let port = select_port(sensor, &config, worker_tx.clone());

        Self {
            config,
            port,
            worker: Some(worker),
            worker_tx,
            event_rx,
            tracked: HashSet::new(),
            destroyed: false,
        }
    }

    /// The effective configuration this engine runs with.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Begin tracking a content list.
    ///
    /// Items are registered with the worker (placeholders are announced if
    /// configured) and observed by the visibility port. Ids seen before
    /// are skipped, so this is safe to call with overlapping lists.
    pub fn observe(&mut self, items: Vec<TrackedItem>) {
        if self.destroyed {
            return;
        }
        let new_items: Vec<TrackedItem> = items
            .into_iter()
            .filter(|item| self.tracked.insert(item.id().clone()))
            .collect();
        if new_items.is_empty() {
            return;
        }

        // The worker must know an item before its visibility can fire.
        let _ = self.worker_tx.send(WorkerMessage::Track(new_items.clone()));
        for item in &new_items {
            self.port.observe(item);
        }
    }

    /// Re-scan after the content list changed.
    ///
    /// Newly added items start tracking; existing items keep their state
    /// and nothing already cached is discarded.
    pub fn update_items(&mut self, items: Vec<TrackedItem>) {
        self.observe(items);
    }

    /// Stop observing a single item (e.g. it left the virtualized window).
    pub fn unobserve(&mut self, item: &ItemId) {
        if !self.destroyed {
            self.port.unobserve(item);
        }
    }

    /// Warm the cache for a resource ahead of need.
    pub fn preload(&self, descriptor: PreloadDescriptor) {
        if !self.destroyed {
            let _ = self.worker_tx.send(WorkerMessage::Preload(descriptor));
        }
    }

    /// The outbound event receiver, for `select!`-style hosts.
    pub const fn event_receiver(&self) -> &Receiver<EngineEvent> {
        &self.event_rx
    }

    /// Poll for the next engine event (non-blocking).
    pub fn poll_event(&self) -> Option<EngineEvent> {
        match self.event_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain all pending engine events.
    pub fn drain_events(&self) -> Vec<EngineEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Full teardown: disconnect sensing, discard queued prefetches, stop
    /// the worker.
    ///
    /// No loads fire after this returns, even if the sensing mechanism
    /// would still report crossings. A fetch already in flight is not
    /// aborted — this call waits for it, and its result lands in the cache
    /// without being applied.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        self.port.disconnect();
        if let Some(worker) = self.worker.take() {
            worker.shutdown();
            let _ = self.worker_tx.send(WorkerMessage::Shutdown);
            worker.join();
        }
        log::debug!("engine destroyed");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.destroy();
    }
}
