//! Actor model: message-passing concurrency for the loading engine.
//!
//! This module implements a small actor system over crossbeam channels:
//! - **Load worker**: the single consumer owning all loading state
//! - **Ticker**: paced ticks for frame-coalesced window recomputation
//! - **Engine**: the public façade coordinating ports and worker
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐   VisibilityEvent   ┌──────────────┐
//! │ Viewport port │ ──────────────────▶ │              │
//! └───────────────┘                     │ Load worker  │
//! ┌───────────────┐  Track / Preload    │  (items,     │
//! │ Engine façade │ ──────────────────▶ │   cache,     │
//! └───────────────┘                     │   prefetch)  │
//!        ▲                              └──────┬───────┘
//!        │           EngineEvent               │
//!        └──────────────────────────────────────┘
//! ```
//!
//! One inbound channel, one consumer: FIFO processing of visibility and
//! tracking messages is what serializes all cache and state mutation
//! without locks.

mod engine;
mod messages;
mod ticker;
mod worker;

pub use engine::Engine;
pub use messages::{EngineEvent, VisibilityEvent, WorkerMessage};
pub use ticker::{Tick, TickerActor};
