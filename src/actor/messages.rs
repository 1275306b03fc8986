//! Message types for actor communication.
//!
//! These enums define the protocol between the visibility ports, the load
//! worker, and the host.

use std::time::Duration;

use crate::error::LoadError;
use crate::loader::ResolvedResource;
use crate::media::{ItemId, PreloadDescriptor, ResourceKey, ResourceLocator, TrackedItem};

/// An item crossed the configured visibility boundary.
///
/// Produced by a [`ViewportPort`](crate::viewport::ViewportPort)
/// implementation and consumed, in arrival order, by the load worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityEvent {
    /// The item that crossed.
    pub item: ItemId,
    /// `true` when the item entered the sensing box. Ports running with
    /// `trigger_once` never emit `false`.
    pub visible: bool,
}

/// Work sent to the load worker.
///
/// One channel, one consumer: every message is processed in FIFO order on
/// the worker thread, which is what serializes all cache and state
/// mutation.
#[derive(Debug)]
pub enum WorkerMessage {
    /// A visibility boundary crossing.
    Visibility(VisibilityEvent),

    /// Track items (initial observe or a later re-scan). Items whose id is
    /// already tracked are skipped; existing state and cache survive.
    Track(Vec<TrackedItem>),

    /// Warm the cache for an ahead-of-need resource.
    Preload(PreloadDescriptor),

    /// Stop the worker. Pending prefetch candidates are discarded.
    Shutdown,
}

/// Outbound notifications the presentation layer applies.
///
/// The worker never touches presentation itself; everything user-visible
/// happens by the host draining these.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A newly tracked item should show the configured placeholder.
    Placeholder {
        /// The item to cover.
        item: ItemId,
        /// The placeholder locator.
        placeholder: ResourceLocator,
    },

    /// A resource resolved; swap it in and start the fade.
    Applied {
        /// The item to update.
        item: ItemId,
        /// The resolved primary resource.
        resource: ResolvedResource,
        /// The resolved responsive variant, when one was requested and
        /// resolved.
        variant: Option<ResolvedResource>,
        /// Opacity transition duration for the swap.
        fade_in: Duration,
    },

    /// A load failed; the placeholder stays. No retry will follow.
    Failed {
        /// The item that failed.
        item: ItemId,
        /// Why. The same failure is shared by every requester of this key.
        error: LoadError,
    },

    /// A prefetch or preload warmed the cache for a key.
    Warmed {
        /// The warmed resource key.
        key: ResourceKey,
    },
}
