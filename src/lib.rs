//! # msghub
//!
//! **msghub** is an in-process, type-routed publish/subscribe hub for Rust.
//!
//! Producers publish plain values; consumers subscribe per concrete message
//! type and receive every published value of exactly that type. The hub holds
//! subscribers **weakly**: a handler whose owner is gone is never invoked and
//! its entry is cleaned up lazily, so wiring two components through the hub
//! never extends either one's lifetime.
//!
//! The same weak-listener idea is packaged separately as [`ChangeForwarder`],
//! which adapts a change-notifying source (anything exposing [`ChangeEvents`])
//! into a caller-supplied callback without creating a strong source→listener
//! edge.
//!
//! ## Architecture
//! ```text
//!  producer ──► MessageHub::publish(msg)
//!                   │  (read lock: TypeId → registry map)
//!                   ▼
//!          HandlerRegistry<M>          one per concrete message type,
//!                   │                  own RwLock, never contends with
//!       ┌───────────┼───────────┐      registries of other types
//!       ▼           ▼           ▼
//!    weak slot   weak slot   weak slot   (identity-keyed, insertion order)
//!       │           │           │
//!    upgrade     upgrade      dead ──► skipped, compacted after delivery
//!       ▼           ▼
//!    handler     handler      invoked outside all locks; a panicking
//!                             handler is caught and logged, the rest run
//!
//!  consumer ──► MessageHub::subscribe(handler) ──► Subscription (token)
//!                             the token holds the strong anchor; dropping
//!                             or unsubscribing it removes exactly its slot
//! ```
//!
//! ## Guarantees
//! - Routing is by **exact concrete type**; supertypes and traits never match.
//! - Publishing with zero subscribers is a no-op, not an error.
//! - Locks are held only for registry bookkeeping, never across handler
//!   invocation, so a handler may freely subscribe, unsubscribe, or publish.
//! - Within one publish, handlers run in subscription order; across
//!   concurrent publishes no ordering is guaranteed.
//!
//! ## Example
//! ```rust
//! use msghub::MessageHub;
//!
//! struct OrderPlaced {
//!     id: u64,
//! }
//!
//! let hub = MessageHub::new();
//! let mut sub = hub.subscribe(|m: &OrderPlaced| {
//!     println!("order {} placed", m.id);
//! });
//!
//! hub.publish(OrderPlaced { id: 1 });
//!
//! sub.unsubscribe();
//! hub.publish(OrderPlaced { id: 2 }); // no longer delivered
//! ```

mod error;
mod hub;
mod observe;

// ---- Public re-exports ----

pub use error::HubError;
pub use hub::{Message, MessageHub, Subscription};
pub use observe::{ChangeEvents, ChangeForwarder, ListenerId, NotifyChanged, ObservableValue};
