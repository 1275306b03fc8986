//! Coalesced recomputation of the virtualization window.
//!
//! Scroll and resize inputs arrive far faster than re-rendering is worth.
//! The tracker absorbs them into dirty flags and recomputes at most once
//! per tick (the host drives [`WindowTracker::on_tick`] from its frame
//! pacing, e.g. the [`TickerActor`](crate::actor::TickerActor)), reporting
//! a range only when it actually changed.

use bitflags::bitflags;

use super::range::{compute_visible_range, VisibleRange};

bitflags! {
    /// Which inputs changed since the last recomputation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyInputs: u8 {
        /// Scroll offset moved.
        const SCROLL = 1 << 0;
        /// Viewport height changed (resize).
        const VIEWPORT = 1 << 1;
        /// The item list length changed.
        const ITEMS = 1 << 2;
    }
}

/// Tracks scroll state and computes the visible window on demand.
#[derive(Debug)]
pub struct WindowTracker {
    item_height: f32,
    buffer: usize,
    item_count: usize,
    scroll_offset: f32,
    viewport_height: f32,
    dirty: DirtyInputs,
    last: Option<VisibleRange>,
}

impl WindowTracker {
    /// Create a tracker. The first `on_tick` after construction computes
    /// the initial window.
    pub const fn new(item_height: f32, viewport_height: f32, item_count: usize, buffer: usize) -> Self {
        Self {
            item_height,
            buffer,
            item_count,
            scroll_offset: 0.0,
            viewport_height,
            dirty: DirtyInputs::all(),
            last: None,
        }
    }

    /// Record a scroll position. Cheap; no recomputation happens here.
    pub fn set_scroll_offset(&mut self, offset: f32) {
        if (offset - self.scroll_offset).abs() > f32::EPSILON {
            self.scroll_offset = offset;
            self.dirty |= DirtyInputs::SCROLL;
        }
    }

    /// Record a viewport height (resize).
    pub fn set_viewport_height(&mut self, height: f32) {
        if (height - self.viewport_height).abs() > f32::EPSILON {
            self.viewport_height = height;
            self.dirty |= DirtyInputs::VIEWPORT;
        }
    }

    /// Record a new list length (content changed).
    pub fn set_item_count(&mut self, count: usize) {
        if count != self.item_count {
            self.item_count = count;
            self.dirty |= DirtyInputs::ITEMS;
        }
    }

    /// The most recently computed window, if any.
    pub const fn current(&self) -> Option<VisibleRange> {
        self.last
    }

    /// Recompute if any input changed since the last tick.
    ///
    /// Returns the new range only when it differs from the previous one,
    /// so hosts can re-render exactly on change. A list that became empty
    /// reports no range; observe that through [`Self::current`].
    pub fn on_tick(&mut self) -> Option<VisibleRange> {
        if self.dirty.is_empty() {
            return None;
        }
        log::trace!("window recompute, dirty={:?}", self.dirty);
        self.dirty = DirtyInputs::empty();

        let computed = compute_visible_range(
            self.scroll_offset,
            self.viewport_height,
            self.item_height,
            self.item_count,
            self.buffer,
        );
        if computed == self.last {
            return None;
        }
        self.last = computed;
        computed
    }
}
