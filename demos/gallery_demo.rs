//! Gallery demo: a simulated scroll session over a long image list.
//!
//! Drives the full pipeline: a scripted viewport sensor stands in for the
//! host's sensing machinery, the window tracker virtualizes a 60-item
//! gallery, and the engine lazy-loads and prefetches as the "user"
//! scrolls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use lightbox::{
    Engine, FetchRequest, ItemId, NetworkClass, ResolvedResource, ResourceLocator, SensorReading,
    TrackedItem, ViewportSensor, WindowTracker,
};

const ITEM_COUNT: usize = 60;
const ITEM_HEIGHT: f32 = 300.0;
const VIEWPORT_HEIGHT: f32 = 900.0;

/// Sensor fed by the demo's scroll loop instead of real geometry.
struct SimulatedSensor {
    feed: Arc<Mutex<VecDeque<SensorReading>>>,
}

impl ViewportSensor for SimulatedSensor {
    fn arm(&mut self, margin_px: f32, threshold: f32) {
        println!("[sensor] armed: margin {margin_px}px, threshold {threshold}");
    }

    fn watch(&mut self, _item: ItemId) {}

    fn unwatch(&mut self, _item: &ItemId) {}

    fn poll(&mut self, timeout: Duration) -> Option<SensorReading> {
        let next = self.feed.lock().unwrap().pop_front();
        if next.is_none() {
            thread::sleep(timeout);
        }
        next
    }
}

fn item(index: usize) -> TrackedItem {
    TrackedItem::new(
        ItemId::new(format!("photo-{index:02}")),
        ResourceLocator::new(format!("/gallery/photo-{index:02}.avif")),
    )
    .with_variant(ResourceLocator::new(format!(
        "/gallery/photo-{index:02}@2x.avif"
    )))
}

fn main() {
    println!("Lightbox Gallery Demo");
    println!("=====================");
    println!();

    let feed: Arc<Mutex<VecDeque<SensorReading>>> = Arc::new(Mutex::new(VecDeque::new()));
    let sensor = Box::new(SimulatedSensor {
        feed: Arc::clone(&feed),
    });

    // A loader that pretends every fetch takes a few milliseconds.
    let loader = Box::new(|request: &FetchRequest| {
        thread::sleep(Duration::from_millis(2));
        Ok(ResolvedResource::new(request.locator().clone()))
    });

    let mut engine = Engine::new(loader, Some(sensor), &NetworkClass::Fast);
    let mut tracker = WindowTracker::new(ITEM_HEIGHT, VIEWPORT_HEIGHT, ITEM_COUNT, 2);

    // Scroll from the top to item ~20 in uneven steps, the way a wheel
    // or touch scroll actually arrives.
    for (step, offset) in [0.0, 240.0, 900.0, 1380.0, 2700.0, 4200.0, 6000.0]
        .into_iter()
        .enumerate()
    {
        tracker.set_scroll_offset(offset);
        let Some(range) = tracker.on_tick() else {
            continue;
        };
        println!("[scroll {step}] offset {offset:>6}: window {}..={}", range.start, range.end);

        // Materialize the window and let the engine track it.
        engine.update_items(range.indices().map(item).collect());

        // Whatever is actually inside the viewport reports itself visible.
        let first_on_screen = (offset / ITEM_HEIGHT) as usize;
        let last_on_screen =
            (((offset + VIEWPORT_HEIGHT) / ITEM_HEIGHT) as usize).min(ITEM_COUNT - 1);
        let mut feed = feed.lock().unwrap();
        for index in first_on_screen..=last_on_screen {
            feed.push_back(SensorReading {
                item: ItemId::new(format!("photo-{index:02}")),
                ratio: 1.0,
            });
        }
        drop(feed);

        // Give the worker a moment, then show what landed.
        thread::sleep(Duration::from_millis(120));
        for event in engine.drain_events() {
            match event {
                lightbox::EngineEvent::Applied { item, .. } => println!("  applied  {item}"),
                lightbox::EngineEvent::Warmed { key } => println!("  warmed   {key}"),
                lightbox::EngineEvent::Failed { item, error } => {
                    println!("  failed   {item}: {error}");
                }
                lightbox::EngineEvent::Placeholder { .. } => {}
            }
        }
    }

    engine.destroy();
    println!();
    println!("Demo complete.");
}
