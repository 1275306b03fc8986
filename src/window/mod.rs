//! Virtualized window calculation: which slice of a long list should
//! exist at all.
//!
//! The calculator is pure math over scroll offset, viewport height, item
//! height, and a buffer; the tracker adds frame-coalesced recomputation
//! and change-only notification. Hosts feed the resulting range back into
//! what they materialize and register with the visibility port.

mod range;
mod tracker;

pub use range::{compute_visible_range, VisibleRange};
pub use tracker::{DirtyInputs, WindowTracker};
