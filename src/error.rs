//! Error taxonomy for the loading engine.
//!
//! Every failure in this crate is absorbed at the engine boundary: logged,
//! surfaced as an [`EngineEvent`](crate::actor::EngineEvent) where a host
//! cares, and never propagated to the presentation layer as a panic or a
//! `Result`. The types here exist so absorbed failures are classified and
//! loggable, not so callers can match on them in hot paths.

use thiserror::Error;

/// A resource fetch that did not produce a usable resource.
///
/// Produced by the host's [`ResourceLoader`](crate::loader::ResourceLoader)
/// and memoized by the cache, so every requester of the same key shares the
/// same failure. `Clone` is required for that sharing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The resource could not be fetched at all (network, 4xx/5xx, ...).
    #[error("fetch failed for {locator}: {reason}")]
    Fetch {
        /// Locator that was being fetched.
        locator: String,
        /// Host-provided failure description.
        reason: String,
    },

    /// The resource was fetched but could not be decoded or used.
    #[error("decode failed for {locator}: {reason}")]
    Decode {
        /// Locator that was being decoded.
        locator: String,
        /// Host-provided failure description.
        reason: String,
    },
}

/// A malformed configuration value.
///
/// Never fatal: the option resolver substitutes the adaptive default and
/// logs the rejected value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// `root_margin` was not a recognizable pixel length.
    #[error("invalid root margin {0:?}, expected e.g. \"50px\"")]
    InvalidMargin(String),

    /// An intersection threshold was outside `0.0..=1.0` or not finite.
    #[error("invalid intersection threshold {0}")]
    InvalidThreshold(f32),

    /// A stepped threshold list contained no usable ratio.
    #[error("threshold list contains no usable ratio")]
    EmptyThreshold,
}

/// Top-level classification of absorbed engine failures.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The host provides no viewport sensing capability; the engine falls
    /// back to eager loading.
    #[error("host provides no viewport sensing capability, loading eagerly")]
    SensingUnavailable,

    /// A resource load failed (the item stays on its placeholder).
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A configuration value was rejected (a default was substituted).
    #[error(transparent)]
    Config(#[from] ConfigError),
}
