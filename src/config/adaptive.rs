//! Network-aware tuning: maps a detected network class to loading
//! thresholds.
//!
//! Resolution happens once at engine construction from an injected
//! [`NetworkClassProvider`]; connection-type changes mid-session are rare
//! enough that the resulting staleness is accepted.

use std::time::Duration;

/// Coarse classification of connection quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NetworkClass {
    /// 2g / slow-2g: load late, fade fast, barely speculate.
    Slow,
    /// 3g or anything unrecognized.
    #[default]
    Default,
    /// 4g: load early and speculate freely.
    Fast,
}

impl NetworkClass {
    /// Classify a host-reported effective connection type string
    /// (`"slow-2g"`, `"2g"`, `"3g"`, `"4g"`). Unknown values classify as
    /// [`NetworkClass::Default`].
    pub fn from_effective_type(effective_type: &str) -> Self {
        match effective_type {
            "slow-2g" | "2g" => Self::Slow,
            "4g" => Self::Fast,
            _ => Self::Default,
        }
    }
}

/// Host capability reporting the current network class.
pub trait NetworkClassProvider {
    /// The network class at the time of the call.
    fn network_class(&self) -> NetworkClass;
}

/// A fixed class is itself a provider; handy for tests and for hosts that
/// sample connectivity themselves.
impl NetworkClassProvider for NetworkClass {
    fn network_class(&self) -> NetworkClass {
        *self
    }
}

/// Tuned runtime parameters derived from a network class.
///
/// Immutable once derived. The exact values are policy, pinned by the
/// tests below rather than by any contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveConfig {
    /// How far outside the viewport an item counts as "near" (px).
    pub margin_px: f32,
    /// Intersection ratio at which an item fires visible.
    pub threshold: f32,
    /// Fade-in duration applied when a resource lands.
    pub fade_in: Duration,
    /// Neighbor-prefetch fan-out on each side of a visible item.
    pub prefetch_fan_out: usize,
}

impl AdaptiveConfig {
    /// Derive the tuned parameters for `class`.
    pub const fn resolve(class: NetworkClass) -> Self {
        match class {
            // Slow pipes: wait until items are nearly on-screen, keep the
            // transition snappy, and spend almost nothing on speculation.
            NetworkClass::Slow => Self {
                margin_px: 10.0,
                threshold: 0.5,
                fade_in: Duration::from_millis(150),
                prefetch_fan_out: 1,
            },
            NetworkClass::Default => Self {
                margin_px: 50.0,
                threshold: 0.1,
                fade_in: Duration::from_millis(300),
                prefetch_fan_out: 2,
            },
            // Fast pipes: pull work forward aggressively.
            NetworkClass::Fast => Self {
                margin_px: 100.0,
                threshold: 0.1,
                fade_in: Duration::from_millis(500),
                prefetch_fan_out: 4,
            },
        }
    }
}
