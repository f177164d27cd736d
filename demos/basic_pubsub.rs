//! # Example: basic_pubsub
//!
//! Demonstrates the core publish/subscribe flow.
//!
//! Shows how to:
//! - Subscribe handlers per concrete message type.
//! - Publish synchronously and via the background pool.
//! - Unsubscribe with the [`Subscription`] token.
//!
//! ## Flow
//! ```text
//! MessageHub::subscribe(|m: &OrderPlaced| ...) ──► Subscription
//! MessageHub::publish(OrderPlaced { .. })      ──► handler runs inline
//! MessageHub::publish_async(OrderPlaced { .. })──► handler runs on the
//!                                                  blocking pool
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_pubsub
//! ```

use msghub::MessageHub;

struct OrderPlaced {
    id: u64,
}

struct OrderCancelled {
    id: u64,
    reason: &'static str,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let hub = MessageHub::new();

    let placed = hub.subscribe(|m: &OrderPlaced| {
        println!("[placed] id={}", m.id);
    });
    let _cancelled = hub.subscribe(|m: &OrderCancelled| {
        println!("[cancelled] id={} reason={}", m.id, m.reason);
    });

    // Synchronous delivery on this thread, routed by exact type.
    hub.publish(OrderPlaced { id: 1 });
    hub.publish(OrderCancelled {
        id: 1,
        reason: "out of stock",
    });

    // Background delivery; the handle completes when delivery does.
    hub.publish_async(OrderPlaced { id: 2 })
        .await
        .expect("background publish");

    // After disposal the handler no longer receives anything.
    drop(placed);
    hub.publish(OrderPlaced { id: 3 }); // silent: no live subscriber

    println!("live OrderPlaced subscribers: {}", hub.live_subscribers::<OrderPlaced>());
}
