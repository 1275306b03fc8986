//! Smoke test: engine construction and the eager fallback path.

use lightbox::{
    Engine, FetchRequest, NetworkClass, ResolvedResource, ResourceLocator, TrackedItem,
};

fn main() {
    println!("Lightbox Smoke Test");
    println!("===================");
    println!();
    println!("ItemId size:       {} bytes", std::mem::size_of::<lightbox::ItemId>());
    println!("LoadState size:    {} bytes", std::mem::size_of::<lightbox::LoadState>());
    println!("VisibleRange size: {} bytes", std::mem::size_of::<lightbox::VisibleRange>());
    println!();

    // A loader that "resolves" instantly.
    let loader = Box::new(|request: &FetchRequest| {
        Ok(ResolvedResource::new(request.locator().clone()).with_dimensions(1600, 900))
    });

    // No sensing capability: every observed item loads eagerly.
    let mut engine = Engine::new(loader, None, &NetworkClass::Default);
    println!(
        "Engine config: margin {}px, threshold {}, fade {:?}, fan-out {}",
        engine.config().margin_px,
        engine.config().threshold,
        engine.config().fade_in,
        engine.config().prefetch_fan_out,
    );
    println!();

    engine.observe(
        (0..4)
            .map(|i| {
                TrackedItem::new(
                    lightbox::ItemId::new(format!("item-{i}")),
                    ResourceLocator::new(format!("/img/{i}.avif")),
                )
            })
            .collect(),
    );

    let mut applied = 0;
    while applied < 4 {
        match engine
            .event_receiver()
            .recv_timeout(std::time::Duration::from_millis(500))
        {
            Ok(lightbox::EngineEvent::Applied { item, resource, .. }) => {
                println!("applied {item} <- {}", resource.locator());
                applied += 1;
            }
            Ok(event) => println!("event: {event:?}"),
            Err(_) => break,
        }
    }

    engine.destroy();
    println!();
    println!("Smoke test complete: {applied}/4 items applied.");
}
