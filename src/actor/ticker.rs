//! Ticker actor: a dedicated thread generating paced timing events.
//!
//! This is the engine's animation-frame equivalent. Hosts drive
//! [`WindowTracker::on_tick`](crate::window::WindowTracker::on_tick) from
//! it so that bursts of scroll and resize input coalesce into at most one
//! window recomputation per tick.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A tick event sent at regular intervals.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Tick number (monotonically increasing).
    pub frame: u64,
    /// Time elapsed since the ticker was started.
    pub elapsed: Duration,
}

/// Ticker actor that generates regular timing events.
pub struct TickerActor {
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Receiver for tick events.
    tick_rx: Receiver<Tick>,
}

impl TickerActor {
    /// Spawn a ticker with the given interval (16ms approximates a 60Hz
    /// frame cadence).
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the ticker thread.
    pub fn spawn(interval: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        // Small buffer on purpose: a receiver that falls behind loses
        // ticks rather than queuing a backlog of stale frames.
        let (tick_tx, tick_rx) = bounded(2);

        let handle = thread::Builder::new()
            .name("lightbox-ticker".to_string())
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_clone, interval);
            })
            .expect("Failed to spawn ticker thread");

        Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
        }
    }

    /// Get a reference to the tick receiver.
    ///
    /// Use this with `select!` alongside the engine's event receiver:
    ///
    /// ```ignore
    /// loop {
    ///     select! {
    ///         recv(engine.event_receiver()) -> event => apply(event),
    ///         recv(ticker.receiver()) -> _tick => {
    ///             if let Some(range) = tracker.on_tick() {
    ///                 rebuild_window(range);
    ///             }
    ///         }
    ///     }
    /// }
    /// ```
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Signal the ticker to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the ticker thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main ticker loop.
    fn run_loop(tick_tx: &Sender<Tick>, shutdown: &Arc<AtomicBool>, interval: Duration) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut next_tick = start + interval;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let now = Instant::now();
            if now >= next_tick {
                let tick = Tick {
                    frame,
                    elapsed: now - start,
                };

                // Non-blocking send: if the buffer is full the receiver is
                // behind, and this tick is dropped instead of queued.
                let _ = tick_tx.try_send(tick);

                frame += 1;
                next_tick += interval;

                // If we fell behind, re-anchor instead of bursting.
                if next_tick < now {
                    next_tick = now + interval;
                }
            } else {
                let sleep_duration = next_tick - now;
                thread::sleep(sleep_duration.min(Duration::from_millis(1)));
            }
        }
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
