//! Tracked items and their load-state machine.

use std::fmt;

/// Identity of a viewable item, assigned by the content layer.
///
/// Opaque to the engine: it is only compared, hashed, and echoed back in
/// outbound events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A URL-shaped reference to a loadable resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocator(String);

impl ResourceLocator {
    /// Create a locator from any string-like value.
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// The locator as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The cache key this locator de-duplicates under.
    ///
    /// Two items referencing the same locator share one fetch, so the key
    /// is the locator itself.
    pub fn key(&self) -> ResourceKey {
        ResourceKey(self.0.clone())
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceLocator {
    fn from(locator: &str) -> Self {
        Self::new(locator)
    }
}

/// De-duplication key for the resource cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-item load status.
///
/// Transitions are monotonic: `Pending → Loading → {Loaded, Error}`. A
/// terminal state is never left, enforced by [`TrackedItem`]'s transition
/// methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// Not yet requested.
    #[default]
    Pending,
    /// A fetch is in flight.
    Loading,
    /// The resource was applied.
    Loaded,
    /// The fetch failed; the placeholder persists. No automatic retry.
    Error,
}

impl LoadState {
    /// Whether this state can never change again.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Loaded | Self::Error)
    }
}

/// One media placeholder registered with the engine.
///
/// Carries a primary resource locator and, optionally, a responsive
/// variant (the `srcset` analogue) resolved alongside it.
#[derive(Debug, Clone)]
pub struct TrackedItem {
    id: ItemId,
    primary: ResourceLocator,
    variant: Option<ResourceLocator>,
    state: LoadState,
}

impl TrackedItem {
    /// Create a pending item.
    pub const fn new(id: ItemId, primary: ResourceLocator) -> Self {
        Self {
            id,
            primary,
            variant: None,
            state: LoadState::Pending,
        }
    }

    /// Attach a responsive-variant locator.
    #[must_use]
    pub fn with_variant(mut self, variant: ResourceLocator) -> Self {
        self.variant = Some(variant);
        self
    }

    /// The item's id.
    pub const fn id(&self) -> &ItemId {
        &self.id
    }

    /// The primary resource locator.
    pub const fn primary(&self) -> &ResourceLocator {
        &self.primary
    }

    /// The responsive-variant locator, if any.
    pub const fn variant(&self) -> Option<&ResourceLocator> {
        self.variant.as_ref()
    }

    /// Current load state.
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Move `Pending → Loading`.
    ///
    /// Returns `false` (and changes nothing) from any other state — this is
    /// the idempotence guard that makes double-firing visibility callbacks
    /// harmless.
    pub fn begin_load(&mut self) -> bool {
        if self.state == LoadState::Pending {
            self.state = LoadState::Loading;
            true
        } else {
            false
        }
    }

    /// Move `Loading → Loaded`.
    pub fn complete(&mut self) {
        debug_assert_eq!(self.state, LoadState::Loading);
        if self.state == LoadState::Loading {
            self.state = LoadState::Loaded;
        }
    }

    /// Move `Loading → Error`.
    pub fn fail(&mut self) {
        debug_assert_eq!(self.state, LoadState::Loading);
        if self.state == LoadState::Loading {
            self.state = LoadState::Error;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> TrackedItem {
        TrackedItem::new(ItemId::new("hero"), ResourceLocator::new("/img/hero.avif"))
    }

    #[test]
    fn test_shared_locators_share_keys() {
        let a = ResourceLocator::new("/img/bg.avif");
        let b = ResourceLocator::new("/img/bg.avif");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_state_machine_happy_path() {
        let mut item = item();
        assert_eq!(item.state(), LoadState::Pending);
        assert!(item.begin_load());
        assert_eq!(item.state(), LoadState::Loading);
        item.complete();
        assert_eq!(item.state(), LoadState::Loaded);
        assert!(item.state().is_terminal());
    }

    #[test]
    fn test_begin_load_is_idempotent() {
        let mut item = item();
        assert!(item.begin_load());
        // Second visibility callback for the same item must be a no-op.
        assert!(!item.begin_load());
        assert_eq!(item.state(), LoadState::Loading);
    }

    #[test]
    fn test_terminal_states_never_regress() {
        let mut item = item();
        item.begin_load();
        item.fail();
        assert_eq!(item.state(), LoadState::Error);
        assert!(!item.begin_load());
        assert_eq!(item.state(), LoadState::Error);
    }

    #[test]
    fn test_variant_builder() {
        let item = item().with_variant(ResourceLocator::new("/img/hero-2x.avif"));
        assert_eq!(item.variant().unwrap().as_str(), "/img/hero-2x.avif");
    }
}
