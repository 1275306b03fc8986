//! Lazy load coordinator: the per-item state machine that turns a
//! visibility crossing into exactly one applied resource.
//!
//! The coordinator owns every piece of mutable loading state — the item
//! registry, the resource cache, and the prefetch queue — and is itself
//! owned by the load worker's thread, so nothing here needs a lock. All
//! its effects leave through the outbound [`EngineEvent`] channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use super::prefetch::{plan_neighbors, PrefetchQueue};
use crate::actor::{EngineEvent, VisibilityEvent};
use crate::cache::ResourceCache;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::loader::{FetchRequest, ResourceLoader};
use crate::media::{ItemId, LoadState, PreloadDescriptor, TrackedItem};

/// Single-threaded owner of items, cache, and prefetch state.
pub(crate) struct Coordinator {
    config: EngineConfig,
    loader: Box<dyn ResourceLoader>,
    cache: ResourceCache,
    /// Content order; index positions drive neighbor planning.
    order: Vec<ItemId>,
    items: HashMap<ItemId, TrackedItem>,
    index_of: HashMap<ItemId, usize>,
    prefetch: PrefetchQueue,
    events: Sender<EngineEvent>,
    /// Set by `destroy()`. A fetch that was already in flight when this
    /// flipped completes into the cache, but its result is not applied.
    shutdown: Arc<AtomicBool>,
}

impl Coordinator {
    pub(crate) fn new(
        config: EngineConfig,
        loader: Box<dyn ResourceLoader>,
        events: Sender<EngineEvent>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let prefetch = PrefetchQueue::new(config.prefetch_delay);
        Self {
            config,
            loader,
            cache: ResourceCache::new(),
            order: Vec::new(),
            items: HashMap::new(),
            index_of: HashMap::new(),
            prefetch,
            events,
            shutdown,
        }
    }

    /// Register items in content order. Already-known ids are skipped, so
    /// a re-scan after a content change never resets existing state.
    pub(crate) fn track(&mut self, new_items: Vec<TrackedItem>) {
        for item in new_items {
            if self.items.contains_key(item.id()) {
                continue;
            }
            let id = item.id().clone();
            self.index_of.insert(id.clone(), self.order.len());
            self.order.push(id.clone());

            if let Some(placeholder) = &self.config.placeholder {
                self.emit(EngineEvent::Placeholder {
                    item: id,
                    placeholder: placeholder.clone(),
                });
            }
            self.items.insert(item.id().clone(), item);
        }
        log::debug!("tracking {} items", self.order.len());
    }

    /// Handle a visibility crossing: load the item, then plan its
    /// neighbors for background warming.
    pub(crate) fn on_visibility(&mut self, event: &VisibilityEvent) {
        if !event.visible {
            return;
        }
        let Some(&index) = self.index_of.get(&event.item) else {
            log::debug!("visibility event for untracked item {}", event.item);
            return;
        };
        self.load(&event.item);
        self.schedule_neighbors(index);
    }

    /// Load one item: `Pending → Loading → {Loaded, Error}`, exactly once.
    pub(crate) fn load(&mut self, id: &ItemId) {
        let Some(item) = self.items.get_mut(id) else {
            return;
        };
        // Idempotence guard: re-fired callbacks and already-terminal items
        // fall through here.
        if !item.begin_load() {
            return;
        }
        let primary = item.primary().clone();
        let variant = item.variant().cloned();

        let key = primary.key();
        let request = FetchRequest::image(primary);
        let outcome = {
            let (cache, loader) = (&mut self.cache, &mut self.loader);
            cache.get_or_load(&key, || loader.fetch(&request))
        };

        // Torn down mid-fetch: the cache keeps the result for a future
        // engine, but nothing is applied to the dead item.
        if self.shutdown.load(Ordering::Relaxed) {
            return;
        }

        match outcome.as_ref() {
            Ok(resource) => {
                let resolved_variant = variant.and_then(|locator| {
                    let vkey = locator.key();
                    let vrequest = FetchRequest::image(locator);
                    let (cache, loader) = (&mut self.cache, &mut self.loader);
                    let voutcome = cache.get_or_load(&vkey, || loader.fetch(&vrequest));
                    match voutcome.as_ref() {
                        Ok(v) => Some(v.clone()),
                        Err(err) => {
                            // A broken variant demotes to primary-only.
                            log::warn!("variant absorbed: {}", EngineError::Load(err.clone()));
                            None
                        }
                    }
                });

                if let Some(item) = self.items.get_mut(id) {
                    item.complete();
                }
                self.emit(EngineEvent::Applied {
                    item: id.clone(),
                    resource: resource.clone(),
                    variant: resolved_variant,
                    fade_in: self.config.fade_in,
                });
            }
            Err(err) => {
                log::warn!("load absorbed: {}", EngineError::Load(err.clone()));
                if let Some(item) = self.items.get_mut(id) {
                    item.fail();
                }
                self.emit(EngineEvent::Failed {
                    item: id.clone(),
                    error: err.clone(),
                });
            }
        }
    }

    /// Route an ahead-of-need preload through the cache.
    pub(crate) fn preload(&mut self, descriptor: &PreloadDescriptor) {
        let key = descriptor.locator().key();
        if self.cache.has(&key) {
            return;
        }
        let request = FetchRequest::from_descriptor(descriptor);
        let outcome = {
            let (cache, loader) = (&mut self.cache, &mut self.loader);
            cache.get_or_load(&key, || loader.fetch(&request))
        };
        match outcome.as_ref() {
            Ok(_) => self.emit(EngineEvent::Warmed { key }),
            Err(err) => log::warn!("preload absorbed: {}", EngineError::Load(err.clone())),
        }
    }

    /// Enqueue not-yet-loaded neighbors of a newly visible index.
    fn schedule_neighbors(&mut self, center: usize) {
        let fan_out = self.config.prefetch_fan_out;
        for index in plan_neighbors(center, fan_out, self.order.len()) {
            let id = &self.order[index];
            let Some(item) = self.items.get(id) else {
                continue;
            };
            // Skip anything already handled or already warm.
            if item.state() != LoadState::Pending {
                continue;
            }
            if self.cache.has(&item.primary().key()) {
                continue;
            }
            if self.prefetch.enqueue(id.clone()) {
                log::trace!("prefetch queued {id} (neighbor of index {center})");
            }
        }
    }

    /// How long the worker may block on its channel before the queue has
    /// a candidate due.
    pub(crate) fn prefetch_wait(&self, now: Instant) -> Option<Duration> {
        self.prefetch.wait_hint(now)
    }

    /// Warm at most one due prefetch candidate.
    pub(crate) fn drain_prefetch(&mut self, now: Instant) {
        let Some(id) = self.prefetch.pop_ready(now) else {
            return;
        };
        let Some(item) = self.items.get(&id) else {
            return;
        };
        // The candidate may have become visible (and loaded) while queued.
        if item.state() != LoadState::Pending {
            return;
        }
        let key = item.primary().key();
        if self.cache.has(&key) {
            return;
        }
        let request = FetchRequest::warm(item.primary().clone());
        let outcome = {
            let (cache, loader) = (&mut self.cache, &mut self.loader);
            cache.get_or_load(&key, || loader.fetch(&request))
        };
        match outcome.as_ref() {
            Ok(_) => self.emit(EngineEvent::Warmed { key }),
            // The failure is memoized; if the item later becomes visible
            // it shares this outcome and surfaces as `Failed` then.
            Err(err) => log::warn!("prefetch absorbed: {}", EngineError::Load(err.clone())),
        }
    }

    /// Discard queued prefetch work (teardown).
    pub(crate) fn clear_queue(&mut self) {
        self.prefetch.clear();
    }

    #[cfg(test)]
    pub(crate) fn state_of(&self, id: &ItemId) -> Option<LoadState> {
        self.items.get(id).map(TrackedItem::state)
    }

    #[cfg(test)]
    pub(crate) fn queued_ids(&self) -> Vec<ItemId> {
        self.order
            .iter()
            .filter(|id| self.prefetch.is_queued(id))
            .cloned()
            .collect()
    }

    fn emit(&self, event: EngineEvent) {
        if self.shutdown.load(Ordering::Relaxed) {
            return;
        }
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdaptiveConfig, LazyLoadOptions, NetworkClass};
    use crate::error::LoadError;
    use crate::loader::ResolvedResource;
    use crate::media::ResourceLocator;
    use crossbeam_channel::{unbounded, Receiver};
    use std::sync::atomic::AtomicUsize;

    fn config() -> EngineConfig {
        LazyLoadOptions::default().resolve(&AdaptiveConfig::resolve(NetworkClass::Default))
    }

    /// Loader that counts fetches and fails any locator containing "bad".
    fn counting_loader(calls: Arc<AtomicUsize>) -> Box<dyn ResourceLoader> {
        Box::new(move |request: &FetchRequest| {
            calls.fetch_add(1, Ordering::SeqCst);
            let locator = request.locator().clone();
            if locator.as_str().contains("bad") {
                Err(LoadError::Fetch {
                    locator: locator.as_str().to_string(),
                    reason: "404".to_string(),
                })
            } else {
                Ok(ResolvedResource::new(locator))
            }
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

    fn coordinator(
        config: EngineConfig,
        calls: &Arc<AtomicUsize>,
    ) -> (Coordinator, Receiver<EngineEvent>, Arc<AtomicBool>) {
        let (tx, rx) = unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let coordinator = Coordinator::new(
            config,
            counting_loader(Arc::clone(calls)),
            tx,
            Arc::clone(&shutdown),
        );
        (coordinator, rx, shutdown)
    }

    fn visible(id: &str) -> VisibilityEvent {
        VisibilityEvent {
            item: ItemId::new(id),
            visible: true,
        }
    }

    #[test]
    fn test_load_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (mut c, rx, _) = coordinator(config(), &calls);
        c.track(gallery(3));

        c.on_visibility(&visible("item-1"));
        c.on_visibility(&visible("item-1"));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(c.state_of(&ItemId::new("item-1")), Some(LoadState::Loaded));
        let applied = rx
            .try_iter()
            .filter(|e| matches!(e, EngineEvent::Applied { .. }))
            .count();
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_shared_key_fetches_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (mut c, rx, _) = coordinator(config(), &calls);
        let shared = ResourceLocator::new("/img/texture.avif");
        c.track(vec![
            TrackedItem::new(ItemId::new("a"), shared.clone()),
            TrackedItem::new(ItemId::new("b"), shared),
        ]);

        c.load(&ItemId::new("a"));
        c.load(&ItemId::new("b"));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Both items still reach Loaded and both get an Applied event.
        assert_eq!(c.state_of(&ItemId::new("a")), Some(LoadState::Loaded));
        assert_eq!(c.state_of(&ItemId::new("b")), Some(LoadState::Loaded));
        let applied = rx
            .try_iter()
            .filter(|e| matches!(e, EngineEvent::Applied { .. }))
            .count();
        assert_eq!(applied, 2);
    }

    #[test]
    fn test_failure_is_terminal_without_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (mut c, rx, _) = coordinator(config(), &calls);
        c.track(vec![TrackedItem::new(
            ItemId::new("broken"),
            ResourceLocator::new("/img/bad.avif"),
        )]);

        c.on_visibility(&visible("broken"));
        assert_eq!(c.state_of(&ItemId::new("broken")), Some(LoadState::Error));
        assert!(matches!(rx.try_recv(), Ok(EngineEvent::Failed { .. })));

        // A second crossing must not re-fetch: error is terminal.
        c.on_visibility(&visible("broken"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_neighbor_scenario() {
        // Item 5 visible with fan-out 2 → queue {3, 4, 6, 7}.
        let calls = Arc::new(AtomicUsize::new(0));
        let (mut c, _rx, _) = coordinator(config(), &calls);
        c.track(gallery(10));

        c.on_visibility(&visible("item-5"));

        let queued = c.queued_ids();
        let expected: Vec<ItemId> = [3, 4, 6, 7]
            .iter()
            .map(|n| ItemId::new(format!("item-{n}")))
            .collect();
        assert_eq!(queued, expected);
    }

    #[test]
    fn test_neighbor_planning_skips_loaded_items() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (mut c, _rx, _) = coordinator(config(), &calls);
        c.track(gallery(10));

        c.load(&ItemId::new("item-3"));
        c.on_visibility(&visible("item-5"));

        let queued = c.queued_ids();
        assert!(!queued.contains(&ItemId::new("item-3")));
        assert!(queued.contains(&ItemId::new("item-4")));
    }

    #[test]
    fn test_prefetch_warms_without_applying() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (mut c, rx, _) = coordinator(config(), &calls);
        c.track(gallery(10));

        c.on_visibility(&visible("item-5"));
        let after_load = calls.load(Ordering::SeqCst);

        let now = Instant::now();
        c.drain_prefetch(now);
        assert_eq!(calls.load(Ordering::SeqCst), after_load + 1);

        // Warmed, not Applied: the neighbor stays Pending.
        assert_eq!(c.state_of(&ItemId::new("item-4")), Some(LoadState::Pending));
        let warmed = rx
            .try_iter()
            .filter(|e| matches!(e, EngineEvent::Warmed { .. }))
            .count();
        assert_eq!(warmed, 1);

        // When the warmed neighbor becomes visible, its load is a cache
        // hit: no further fetch.
        c.on_visibility(&visible("item-4"));
        assert_eq!(calls.load(Ordering::SeqCst), after_load + 1);
        assert_eq!(c.state_of(&ItemId::new("item-4")), Some(LoadState::Loaded));
    }

    #[test]
    fn test_variant_failure_demotes_to_primary() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (mut c, rx, _) = coordinator(config(), &calls);
        c.track(vec![TrackedItem::new(
            ItemId::new("hero"),
            ResourceLocator::new("/img/hero.avif"),
        )
        .with_variant(ResourceLocator::new("/img/bad-2x.avif"))]);

        c.load(&ItemId::new("hero"));

        assert_eq!(c.state_of(&ItemId::new("hero")), Some(LoadState::Loaded));
        match rx.try_recv() {
            Ok(EngineEvent::Applied { variant, .. }) => assert!(variant.is_none()),
            other => panic!("expected Applied, got {other:?}"),
        }
    }

    #[test]
    fn test_placeholder_emitted_on_track() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut config = config();
        config.placeholder = Some(ResourceLocator::new("/img/blur.svg"));
        let (mut c, rx, _) = coordinator(config, &calls);

        c.track(gallery(2));

        let placeholders = rx
            .try_iter()
            .filter(|e| matches!(e, EngineEvent::Placeholder { .. }))
            .count();
        assert_eq!(placeholders, 2);
    }

    #[test]
    fn test_retrack_preserves_state() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (mut c, _rx, _) = coordinator(config(), &calls);
        c.track(gallery(3));
        c.load(&ItemId::new("item-0"));

        // Re-scan with one new item appended.
        c.track(gallery(4));

        assert_eq!(c.state_of(&ItemId::new("item-0")), Some(LoadState::Loaded));
        assert_eq!(c.state_of(&ItemId::new("item-3")), Some(LoadState::Pending));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_preload_descriptor_warms_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (mut c, rx, _) = coordinator(config(), &calls);

        let descriptor = PreloadDescriptor::new(
            ResourceLocator::new("/fonts/serif.woff2"),
            crate::media::PreloadRole::Font,
        );
        c.preload(&descriptor);
        c.preload(&descriptor);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(rx.try_recv(), Ok(EngineEvent::Warmed { .. })));
    }

    #[test]
    fn test_shutdown_suppresses_application() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (mut c, rx, shutdown) = coordinator(config(), &calls);
        c.track(gallery(3));

        shutdown.store(true, Ordering::Relaxed);
        c.on_visibility(&visible("item-1"));

        // The fetch completed into the cache, but nothing was applied.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(rx.try_recv().is_err());
    }
}
