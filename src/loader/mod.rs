//! The host fetch boundary.
//!
//! The engine never performs I/O itself: every fetch goes through a
//! host-supplied [`ResourceLoader`]. In a browser-backed host this wraps
//! the network stack; in tests it is a scripted fake.
//!
//! Calls are synchronous on the load worker's thread and carry no
//! timeout — a stalled loader stalls that item (and the prefetch drain)
//! indefinitely, which mirrors the documented behavior of the engine.

use crate::error::LoadError;
use crate::media::{CrossOriginPolicy, PreloadDescriptor, PreloadRole, PriorityHint, ResourceLocator};

/// Everything a loader needs to perform one fetch.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    locator: ResourceLocator,
    role: PreloadRole,
    priority: PriorityHint,
    cross_origin: CrossOriginPolicy,
}

impl FetchRequest {
    /// A lazy-load fetch: an image at loader-chosen priority.
    pub const fn image(locator: ResourceLocator) -> Self {
        Self {
            locator,
            role: PreloadRole::Image,
            priority: PriorityHint::Auto,
            cross_origin: CrossOriginPolicy::None,
        }
    }

    /// A background warm-up fetch: an image at low priority, so it yields
    /// to anything user-visible.
    pub const fn warm(locator: ResourceLocator) -> Self {
        Self {
            locator,
            role: PreloadRole::Image,
            priority: PriorityHint::Low,
            cross_origin: CrossOriginPolicy::None,
        }
    }

    /// The request a preload descriptor translates into.
    pub fn from_descriptor(descriptor: &PreloadDescriptor) -> Self {
        Self {
            locator: descriptor.locator().clone(),
            role: descriptor.role(),
            priority: descriptor.priority(),
            cross_origin: descriptor.cross_origin(),
        }
    }

    /// The resource locator.
    pub const fn locator(&self) -> &ResourceLocator {
        &self.locator
    }

    /// The resource role.
    pub const fn role(&self) -> PreloadRole {
        self.role
    }

    /// The priority hint.
    pub const fn priority(&self) -> PriorityHint {
        self.priority
    }

    /// The cross-origin policy.
    pub const fn cross_origin(&self) -> CrossOriginPolicy {
        self.cross_origin
    }
}

/// A successfully fetched resource, ready for the host to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    locator: ResourceLocator,
    dimensions: Option<(u32, u32)>,
}

impl ResolvedResource {
    /// A resolved resource without intrinsic dimensions.
    pub const fn new(locator: ResourceLocator) -> Self {
        Self {
            locator,
            dimensions: None,
        }
    }

    /// Attach intrinsic pixel dimensions (hosts use these to reserve
    /// layout space before the fade-in).
    #[must_use]
    pub const fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    /// The locator to apply to the presentation target.
    pub const fn locator(&self) -> &ResourceLocator {
        &self.locator
    }

    /// Intrinsic dimensions, if the loader reported them.
    pub const fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }
}

/// Host capability that performs the actual fetch.
///
/// `Send` because the load worker owns it on its own thread.
pub trait ResourceLoader: Send {
    /// Fetch one resource. Blocking; no timeout is imposed by the engine.
    fn fetch(&mut self, request: &FetchRequest) -> Result<ResolvedResource, LoadError>;
}

impl<F> ResourceLoader for F
where
    F: FnMut(&FetchRequest) -> Result<ResolvedResource, LoadError> + Send,
{
    fn fetch(&mut self, request: &FetchRequest) -> Result<ResolvedResource, LoadError> {
        self(request)
    }
}
