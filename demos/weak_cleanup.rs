//! # Example: weak_cleanup
//!
//! Demonstrates weak subscriber lifetime: the hub never keeps a handler
//! alive, and dead entries are cleaned up lazily.
//!
//! Shows how to:
//! - Co-own a handler with [`MessageHub::subscribe_arc`].
//! - Release the token with [`Subscription::forget`] so the caller's `Arc`
//!   alone decides the handler's lifetime.
//! - Observe lazy compaction through [`MessageHub::live_subscribers`].
//!
//! ## Run
//! ```bash
//! cargo run --example weak_cleanup
//! ```

use std::sync::Arc;

use msghub::MessageHub;

struct Tick;

fn main() {
    let hub = MessageHub::new();

    let handler = Arc::new(|_: &Tick| println!("tick observed"));
    hub.subscribe_arc(Arc::clone(&handler)).forget();

    hub.publish(Tick);
    println!("live: {}", hub.live_subscribers::<Tick>()); // 1

    // The last strong reference goes away: the slot is now dead.
    drop(handler);
    println!("live after drop: {}", hub.live_subscribers::<Tick>()); // 0

    // This publish skips the dead entry and compacts it away.
    hub.publish(Tick);
    println!("live after publish: {}", hub.live_subscribers::<Tick>()); // 0
}
