//! Engine configuration: named options, validation, and the merge with
//! network-adaptive defaults.
//!
//! Hosts pass a [`LazyLoadOptions`] of overrides; anything left unset (or
//! malformed) resolves from the [`AdaptiveConfig`] derived for the current
//! network class. Malformed values never abort construction — the default
//! is substituted and the rejection is logged at `warn`.

mod adaptive;

pub use adaptive::{AdaptiveConfig, NetworkClass, NetworkClassProvider};

use std::time::Duration;

use crate::error::{ConfigError, EngineError};
use crate::media::ResourceLocator;

/// Delay between prefetch queue pops. Policy, not contract; override via
/// [`LazyLoadOptions::prefetch_delay`].
pub const DEFAULT_PREFETCH_DELAY: Duration = Duration::from_millis(50);

/// Intersection threshold(s) arming the visibility sensor.
#[derive(Debug, Clone, PartialEq)]
pub enum Threshold {
    /// A single ratio in `0.0..=1.0`.
    Ratio(f32),
    /// Stepped ratios; the smallest usable step arms the sensor, since
    /// lazy loading only cares about the first crossing.
    Steps(Vec<f32>),
}

/// Host-facing named options. All fields are overrides; unset fields take
/// the network-adaptive default.
#[derive(Debug, Clone)]
pub struct LazyLoadOptions {
    /// Sensing margin as a CSS-ish pixel length, e.g. `"50px"`.
    pub root_margin: Option<String>,
    /// Intersection threshold(s).
    pub threshold: Option<Threshold>,
    /// Fire at most once per item, then stop observing it.
    pub trigger_once: bool,
    /// Placeholder applied to items when tracking begins.
    pub placeholder: Option<ResourceLocator>,
    /// Fade-in duration override.
    pub fade_in: Option<Duration>,
    /// Neighbor-prefetch fan-out override.
    pub prefetch_fan_out: Option<usize>,
    /// Inter-item prefetch delay override.
    pub prefetch_delay: Option<Duration>,
}

impl Default for LazyLoadOptions {
    fn default() -> Self {
        Self {
            root_margin: None,
            threshold: None,
            trigger_once: true,
            placeholder: None,
            fade_in: None,
            prefetch_fan_out: None,
            prefetch_delay: None,
        }
    }
}

/// The effective configuration after merging options with adaptive
/// defaults. Immutable for the engine's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Sensing margin in pixels.
    pub margin_px: f32,
    /// Intersection ratio at which items fire visible.
    pub threshold: f32,
    /// Fire at most once per item.
    pub trigger_once: bool,
    /// Placeholder locator, if any.
    pub placeholder: Option<ResourceLocator>,
    /// Fade-in duration for applied resources.
    pub fade_in: Duration,
    /// Neighbor-prefetch fan-out on each side.
    pub prefetch_fan_out: usize,
    /// Delay between prefetch pops.
    pub prefetch_delay: Duration,
}

impl LazyLoadOptions {
    /// Merge these options over `adaptive`, validating as we go.
    pub fn resolve(&self, adaptive: &AdaptiveConfig) -> EngineConfig {
        let margin_px = self.root_margin.as_deref().map_or(adaptive.margin_px, |raw| {
            parse_margin(raw).unwrap_or_else(|err| {
                log::warn!("{}", EngineError::Config(err));
                adaptive.margin_px
            })
        });

        let threshold = self.threshold.as_ref().map_or(adaptive.threshold, |t| {
            resolve_threshold(t).unwrap_or_else(|err| {
                log::warn!("{}", EngineError::Config(err));
                adaptive.threshold
            })
        });

        EngineConfig {
            margin_px,
            threshold,
            trigger_once: self.trigger_once,
            placeholder: self.placeholder.clone(),
            fade_in: self.fade_in.unwrap_or(adaptive.fade_in),
            prefetch_fan_out: self.prefetch_fan_out.unwrap_or(adaptive.prefetch_fan_out),
            prefetch_delay: self.prefetch_delay.unwrap_or(DEFAULT_PREFETCH_DELAY),
        }
    }
}

/// Parse a `"50px"`-shaped margin. A bare number is accepted too.
fn parse_margin(raw: &str) -> Result<f32, ConfigError> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    number
        .parse::<f32>()
        .ok()
        .filter(|px| px.is_finite())
        .ok_or_else(|| ConfigError::InvalidMargin(raw.to_string()))
}

/// Validate a threshold and reduce stepped lists to their arming ratio.
fn resolve_threshold(threshold: &Threshold) -> Result<f32, ConfigError> {
    let valid = |ratio: f32| ratio.is_finite() && (0.0..=1.0).contains(&ratio);
    match threshold {
        Threshold::Ratio(ratio) => {
            if valid(*ratio) {
                Ok(*ratio)
            } else {
                Err(ConfigError::InvalidThreshold(*ratio))
            }
        }
        Threshold::Steps(steps) => steps
            .iter()
            .copied()
            .filter(|ratio| valid(*ratio))
            .min_by(f32::total_cmp)
            .ok_or(ConfigError::EmptyThreshold),
    }
}
