//! # Lightbox
//!
//! A progressive media loading engine for content-driven sites.
//!
//! Lightbox takes an ordered list of media items from a content layer and
//! decides *when* each resource is fetched: lazily as items approach the
//! viewport, speculatively for their neighbors, and never twice for the
//! same resource key.
//!
//! ## Core Concepts
//!
//! - **Visibility-driven loading**: items load when they cross a tuned
//!   margin/threshold boundary, exactly once
//! - **De-duplicating cache**: one fetch per resource key, outcome shared
//!   by every requester
//! - **Neighbor prefetch**: a serial, throttled queue warms items around
//!   whatever just became visible
//! - **Window virtualization**: pure math bounding which slice of a long
//!   list exists at all
//! - **Network-adaptive tuning**: slow connections load late and
//!   speculate little; fast ones pull work forward
//!
//! ## Example
//!
//! ```rust,ignore
//! use lightbox::{Engine, NetworkClass, ResourceLocator, TrackedItem};
//!
//! let loader = Box::new(|request: &lightbox::FetchRequest| {
//!     Ok(lightbox::ResolvedResource::new(request.locator().clone()))
//! });
//!
//! // No sensing capability here, so the engine loads eagerly.
//! let mut engine = Engine::new(loader, None, &NetworkClass::Default);
//! engine.observe(vec![TrackedItem::new(
//!     "hero".into(),
//!     ResourceLocator::new("/img/hero.avif"),
//! )]);
//!
//! for event in engine.drain_events() {
//!     // Apply Placeholder / Applied / Failed to the presentation tree.
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod cache;
pub mod config;
pub mod error;
pub mod load;
pub mod loader;
pub mod media;
pub mod viewport;
pub mod window;

// Re-exports for convenience
pub use actor::{Engine, EngineEvent, Tick, TickerActor, VisibilityEvent};
pub use cache::{CacheEntry, ResourceCache};
pub use config::{AdaptiveConfig, EngineConfig, LazyLoadOptions, NetworkClass, NetworkClassProvider, Threshold};
pub use error::{ConfigError, EngineError, LoadError};
pub use loader::{FetchRequest, ResolvedResource, ResourceLoader};
pub use media::{
    CrossOriginPolicy, ItemId, LoadState, PreloadDescriptor, PreloadRole, PriorityHint,
    ResourceKey, ResourceLocator, TrackedItem,
};
pub use viewport::{EagerPort, SensorPort, SensorReading, ViewportPort, ViewportSensor};
pub use window::{compute_visible_range, VisibleRange, WindowTracker};
