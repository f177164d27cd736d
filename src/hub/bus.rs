//! # Message hub: type-routed publish/subscribe.
//!
//! [`MessageHub`] maps each concrete message type to its own
//! [`HandlerRegistry`] and routes published values to the registry matching
//! their exact [`TypeId`]. Registries are created lazily on first
//! subscription and live for the hub's lifetime (the map grows with the
//! number of distinct message types, not with traffic).
//!
//! The hub is `Clone` (shared inner) and deliberately has **no** global
//! instance: construct one and pass it to whoever needs it, which keeps
//! tests isolated and ownership explicit.
//!
//! - [`MessageHub::publish`] delivers synchronously on the calling thread.
//! - [`MessageHub::publish_async`] offloads the same delivery to the tokio
//!   blocking pool and returns the join handle.
//! - [`MessageHub::subscribe`] registers a handler and returns the
//!   [`Subscription`] token that anchors it.

use std::any::{Any, TypeId};
use std::sync::Arc;

use fxhash::FxHashMap;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::trace;

use crate::hub::message::Message;
use crate::hub::registry::{HandlerFn, HandlerRegistry};
use crate::hub::subscription::Subscription;

/// Type-routed publish/subscribe hub with weak subscriber cleanup.
///
/// Cheap to clone; all clones share the same registries. See the
/// [crate docs](crate) for the delivery and lifetime rules.
#[derive(Clone, Default)]
pub struct MessageHub {
    inner: Arc<HubInner>,
}

#[derive(Default)]
struct HubInner {
    /// Exact concrete type → `Arc<HandlerRegistry<M>>` (type-erased).
    ///
    /// This lock guards only the map itself; each registry has its own
    /// lock, so traffic on distinct message types never contends here
    /// beyond the brief lookup.
    registries: RwLock<FxHashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl MessageHub {
    /// Creates a new, empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `handler` to messages of type `M`.
    ///
    /// The hub stores only a weak reference; the returned [`Subscription`]
    /// holds the strong one. Dropping the token (or calling
    /// [`Subscription::unsubscribe`]) removes exactly this registration —
    /// subscribing the same callback twice yields two independent slots.
    pub fn subscribe<M, F>(&self, handler: F) -> Subscription
    where
        M: Message,
        F: Fn(&M) + Send + Sync + 'static,
    {
        self.subscribe_arc(Arc::new(handler))
    }

    /// Subscribes a caller-owned handler to messages of type `M`.
    ///
    /// Because the caller co-owns the `Arc`, the token can be
    /// [forgotten](Subscription::forget) and the registration then lives
    /// exactly as long as the caller's remaining clones.
    pub fn subscribe_arc<M, F>(&self, handler: Arc<F>) -> Subscription
    where
        M: Message,
        F: Fn(&M) + Send + Sync + 'static,
    {
        let handler: Arc<HandlerFn<M>> = handler;
        let registry = self.registry_for::<M>();
        let id = registry.subscribe(&handler);

        let cancel = move || registry.unsubscribe(id);
        Subscription::new(Box::new(handler), Box::new(cancel))
    }

    /// Publishes `message` synchronously to every live subscriber of its
    /// exact concrete type.
    ///
    /// No registry (nobody ever subscribed to `M`) is a valid no-op.
    /// Handlers run on the calling thread, outside all hub locks; a
    /// panicking handler is caught and logged, and the remaining handlers
    /// still run.
    pub fn publish<M: Message>(&self, message: M) {
        let registry = lookup::<M>(&self.inner.registries.read());
        match registry {
            Some(registry) => registry.publish(&message),
            None => trace!(
                message_type = std::any::type_name::<M>(),
                "publish with no subscribers"
            ),
        }
    }

    /// Schedules [`publish`](Self::publish) on the tokio blocking pool.
    ///
    /// Returns the handle representing delivery completion. Which thread
    /// runs the subscriber callbacks is unspecified. Must be called within
    /// a tokio runtime.
    pub fn publish_async<M: Message>(&self, message: M) -> tokio::task::JoinHandle<()> {
        let hub = self.clone();
        tokio::task::spawn_blocking(move || hub.publish(message))
    }

    /// Diagnostic count of currently-live subscribers for `M`.
    ///
    /// Dead-but-not-yet-compacted slots are not counted. Returns 0 when no
    /// registry exists for `M`.
    pub fn live_subscribers<M: Message>(&self) -> usize {
        lookup::<M>(&self.inner.registries.read()).map_or(0, |registry| registry.live_count())
    }

    /// Resolves the registry for `M`, creating it if absent.
    ///
    /// Optimistic lookup under the upgradable read; only the first
    /// subscriber for a type pays for the write upgrade. Each concrete type
    /// maps to exactly one registry for the hub's lifetime.
    fn registry_for<M: Message>(&self) -> Arc<HandlerRegistry<M>> {
        let map = self.inner.registries.upgradable_read();
        if let Some(registry) = lookup::<M>(&map) {
            return registry;
        }

        let mut map = RwLockUpgradableReadGuard::upgrade(map);
        let registry = Arc::new(HandlerRegistry::new());
        map.insert(TypeId::of::<M>(), Box::new(Arc::clone(&registry)));
        registry
    }
}

fn lookup<M: Message>(
    map: &FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
) -> Option<Arc<HandlerRegistry<M>>> {
    map.get(&TypeId::of::<M>())
        .and_then(|entry| entry.downcast_ref::<Arc<HandlerRegistry<M>>>())
        .map(Arc::clone)
}
