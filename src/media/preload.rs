//! Preload descriptors: resources a page or route wants fetched ahead of
//! need, before any item referencing them becomes visible.

use super::item::ResourceLocator;

/// What kind of resource a preload warms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreloadRole {
    /// A stylesheet.
    Style,
    /// A script.
    Script,
    /// A font file.
    Font,
    /// An image (the default for lazy-loaded media).
    Image,
    /// A whole document (e.g. a route the user is likely to visit next).
    Document,
}

/// Scheduling hint forwarded to the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriorityHint {
    /// Let the loader decide.
    #[default]
    Auto,
    /// Fetch ahead of other speculative work.
    High,
    /// Background fill; yield to anything user-visible.
    Low,
}

/// Cross-origin credential policy for the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrossOriginPolicy {
    /// Same-origin request, no CORS mode.
    #[default]
    None,
    /// CORS request without credentials.
    Anonymous,
    /// CORS request with credentials.
    UseCredentials,
}

/// A resource to fetch ahead of need.
///
/// Consumed exactly once: the engine routes it through the cache, so a
/// descriptor for an already-warmed key is a no-op.
#[derive(Debug, Clone)]
pub struct PreloadDescriptor {
    locator: ResourceLocator,
    role: PreloadRole,
    priority: PriorityHint,
    cross_origin: CrossOriginPolicy,
}

impl PreloadDescriptor {
    /// Create a descriptor with default priority and credential policy.
    pub const fn new(locator: ResourceLocator, role: PreloadRole) -> Self {
        Self {
            locator,
            role,
            priority: PriorityHint::Auto,
            cross_origin: CrossOriginPolicy::None,
        }
    }

    /// Override the priority hint.
    #[must_use]
    pub const fn with_priority(mut self, priority: PriorityHint) -> Self {
        self.priority = priority;
        self
    }

    /// Override the cross-origin policy (fonts usually need `Anonymous`).
    #[must_use]
    pub const fn with_cross_origin(mut self, cross_origin: CrossOriginPolicy) -> Self {
        self.cross_origin = cross_origin;
        self
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
