//! Load worker: the dedicated thread that owns all loading state.
//!
//! This is the system's single consumer. Visibility events, tracking
//! updates, and preload requests arrive on one FIFO channel and are
//! processed strictly in order; between messages the worker drains the
//! prefetch queue one throttled candidate at a time. Because the
//! [`Coordinator`] (items, cache, prefetch queue) lives entirely on this
//! thread, the engine needs no locks anywhere.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::messages::{EngineEvent, WorkerMessage};
use crate::config::EngineConfig;
use crate::load::Coordinator;
use crate::loader::ResourceLoader;

/// How long the worker may sleep when it has neither messages nor due
/// prefetch candidates.
const IDLE_POLL: Duration = Duration::from_millis(16);

/// Actor handle for the load worker thread.
pub(crate) struct LoadWorker {
    /// Handle to the worker thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl LoadWorker {
    /// Spawn the worker thread.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the thread.
    pub(crate) fn spawn(
        receiver: Receiver<WorkerMessage>,
        events: Sender<EngineEvent>,
        loader: Box<dyn ResourceLoader>,
        config: EngineConfig,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("lightbox-worker".to_string())
            .spawn(move || {
                let coordinator =
                    Coordinator::new(config, loader, events, Arc::clone(&shutdown_clone));
                Self::run_loop(&receiver, coordinator, &shutdown_clone);
            })
            .expect("Failed to spawn load worker thread");

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Signal the worker to shutdown.
    ///
    /// An in-flight fetch is not aborted: it completes into the cache,
    /// but its result is no longer applied or announced.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the worker thread to finish.
    pub(crate) fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main worker loop: messages first, then at most one prefetch pop.
    fn run_loop(
        receiver: &Receiver<WorkerMessage>,
        mut coordinator: Coordinator,
        shutdown: &Arc<AtomicBool>,
    ) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                coordinator.clear_queue();
                break;
            }

            // Sleep on the channel until either a message arrives or the
            // next prefetch candidate is due — the cooperative yield that
            // keeps speculative work from starving visibility loads.
            let timeout = coordinator
                .prefetch_wait(Instant::now())
                .unwrap_or(IDLE_POLL);

            match receiver.recv_timeout(timeout) {
                Ok(WorkerMessage::Visibility(event)) => coordinator.on_visibility(&event),
                Ok(WorkerMessage::Track(items)) => coordinator.track(items),
                Ok(WorkerMessage::Preload(descriptor)) => coordinator.preload(&descriptor),
                Ok(WorkerMessage::Shutdown) => {
                    coordinator.clear_queue();
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            coordinator.drain_prefetch(Instant::now());
        }
        log::debug!("load worker stopped");
    }
}

impl Drop for LoadWorker {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::VisibilityEvent;
    use crate::config::{AdaptiveConfig, LazyLoadOptions, NetworkClass};
    use crate::loader::{FetchRequest, ResolvedResource};
    use crate::media::{ItemId, ResourceLocator, TrackedItem};
    use crossbeam_channel::{bounded, unbounded};
    use std::sync::atomic::AtomicUsize;

    fn config() -> EngineConfig {
        let options = LazyLoadOptions {
            // Keep the drain fast so tests are not slow.
            prefetch_delay: Some(Duration::from_millis(5)),
            ..LazyLoadOptions::default()
        };
        options.resolve(&AdaptiveConfig::resolve(NetworkClass::Default))
    }

    fn counting_loader(calls: Arc<AtomicUsize>) -> Box<dyn ResourceLoader> {
        Box::new(move |request: &FetchRequest| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(ResolvedResource::new(request.locator().clone()))
        })
    }

    fn gallery(n: usize) -> Vec<TrackedItem> {
        (0..n)
            .map(|i| {
                TrackedItem::new(
                    ItemId::new(format!("item-{i}")),
                    ResourceLocator::new(format!("/img/{i}.avif")),
                )
            })
            .collect()
    }

    #[test]
    fn test_visibility_message_produces_applied_event() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = bounded(64);
        let (event_tx, event_rx) = unbounded();
        let worker = LoadWorker::spawn(rx, event_tx, counting_loader(Arc::clone(&calls)), config());

        tx.send(WorkerMessage::Track(gallery(3))).unwrap();
        tx.send(WorkerMessage::Visibility(VisibilityEvent {
            item: ItemId::new("item-1"),
            visible: true,
        }))
        .unwrap();

        let event = event_rx.recv_timeout(Duration::from_millis(500)).unwrap();
        assert!(matches!(event, EngineEvent::Applied { .. }));
        worker.join();
    }

    #[test]
    fn test_prefetch_drains_in_background() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = bounded(64);
        let (event_tx, event_rx) = unbounded();
        let worker = LoadWorker::spawn(rx, event_tx, counting_loader(Arc::clone(&calls)), config());

        tx.send(WorkerMessage::Track(gallery(10))).unwrap();
        tx.send(WorkerMessage::Visibility(VisibilityEvent {
            item: ItemId::new("item-5"),
            visible: true,
        }))
        .unwrap();

        // One Applied for item-5, then the four neighbors warm serially.
        let mut applied = 0;
        let mut warmed = 0;
        for _ in 0..5 {
            match event_rx.recv_timeout(Duration::from_millis(500)) {
                Ok(EngineEvent::Applied { .. }) => applied += 1,
                Ok(EngineEvent::Warmed { .. }) => warmed += 1,
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert_eq!(applied, 1);
        assert_eq!(warmed, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        worker.join();
    }

    #[test]
    fn test_shutdown_message_stops_processing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = bounded(64);
        let (event_tx, event_rx) = unbounded();
        let worker = LoadWorker::spawn(rx, event_tx, counting_loader(Arc::clone(&calls)), config());

        tx.send(WorkerMessage::Track(gallery(3))).unwrap();
        tx.send(WorkerMessage::Shutdown).unwrap();
        // Sent after Shutdown: must never be processed.
        tx.send(WorkerMessage::Visibility(VisibilityEvent {
            item: ItemId::new("item-0"),
            visible: true,
        }))
        .unwrap();

        worker.join();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(event_rx.try_recv().is_err());
    }
}
