//! # Per-type weak handler registry.
//!
//! [`HandlerRegistry`] owns the subscriber set for one concrete message type.
//! Each entry is a weak reference plus an identity id, so:
//! - the registry never extends a handler's lifetime;
//! - the same callback subscribed twice occupies two distinct slots;
//! - unsubscribing removes exactly the slot a token was issued for.
//!
//! ## Delivery
//! ```text
//! publish(&msg)
//!   ├─ read lock ──► snapshot live handlers (insertion order),
//!   │                note whether any dead slot was seen
//!   ├─ unlock
//!   ├─ invoke each snapshot handler
//!   │     └─ panic → caught, logged, delivery continues
//!   └─ dead slot seen? ──► compact()
//! ```
//!
//! Handlers run outside all locks, so a handler may subscribe, unsubscribe
//! or publish on the same registry without deadlocking. The price is that a
//! publish racing a subscribe may or may not observe the new slot — whatever
//! the read section captured at lock-acquisition time.
//!
//! ## Compaction
//! Dead slots are skipped during delivery and physically removed lazily:
//! either here, after a publish that saw at least one dead slot, or by an
//! explicit [`HandlerRegistry::compact`] call. Compaction takes an
//! upgradable read first and upgrades to the write lock only when there is
//! something to remove.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::{trace, warn};

use crate::hub::message::Message;

/// Handler signature stored per message type.
pub(crate) type HandlerFn<M> = dyn Fn(&M) + Send + Sync;

/// One subscriber entry: identity id + non-owning handler reference.
struct Slot<M: Message> {
    id: u64,
    handler: Weak<HandlerFn<M>>,
}

/// Weak subscriber set for a single message type.
///
/// One reader/writer lock per registry: publishes for unrelated message
/// types never contend. Reads (publish snapshots) run concurrently; writes
/// (subscribe, unsubscribe, compaction) are mutually exclusive with each
/// other and with reads.
pub(crate) struct HandlerRegistry<M: Message> {
    slots: RwLock<Vec<Slot<M>>>,
    next_id: AtomicU64,
}

impl<M: Message> HandlerRegistry<M> {
    pub(crate) fn new() -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Inserts a new weak slot for `handler` and returns its id.
    ///
    /// The registry only downgrades; the caller (the subscription token)
    /// keeps the strong reference that decides the handler's lifetime.
    pub(crate) fn subscribe(&self, handler: &Arc<HandlerFn<M>>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots.write().push(Slot {
            id,
            handler: Arc::downgrade(handler),
        });
        id
    }

    /// Removes the slot with the given id. Unknown ids are a no-op.
    pub(crate) fn unsubscribe(&self, id: u64) {
        self.slots.write().retain(|slot| slot.id != id);
    }

    /// Delivers `message` to every currently-live handler.
    pub(crate) fn publish(&self, message: &M) {
        let (snapshot, saw_dead) = {
            let slots = self.slots.read();
            let mut live = Vec::with_capacity(slots.len());
            let mut saw_dead = false;
            for slot in slots.iter() {
                match slot.handler.upgrade() {
                    Some(handler) => live.push(handler),
                    None => saw_dead = true,
                }
            }
            (live, saw_dead)
        };

        for handler in snapshot {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| (*handler)(message))) {
                warn!(
                    message_type = std::any::type_name::<M>(),
                    panic = %panic_info(payload.as_ref()),
                    "handler panicked during publish; continuing delivery"
                );
            }
        }

        if saw_dead {
            self.compact();
        }
    }

    /// Removes all currently-dead slots.
    ///
    /// Safe to call concurrently with `publish` and `subscribe`. A slot that
    /// resolved live at snapshot time but died since is simply also removed.
    pub(crate) fn compact(&self) {
        let slots = self.slots.upgradable_read();
        if !slots.iter().any(|slot| slot.handler.strong_count() == 0) {
            return;
        }

        let mut slots = RwLockUpgradableReadGuard::upgrade(slots);
        let before = slots.len();
        slots.retain(|slot| slot.handler.strong_count() > 0);
        trace!(
            message_type = std::any::type_name::<M>(),
            removed = before - slots.len(),
            "compacted dead subscriber slots"
        );
    }

    /// Number of slots whose handler is currently alive.
    pub(crate) fn live_count(&self) -> usize {
        self.slots
            .read()
            .iter()
            .filter(|slot| slot.handler.strong_count() > 0)
            .count()
    }

    /// Raw slot count, dead entries included.
    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.slots.read().len()
    }
}

/// Extracts a printable message from a panic payload.
fn panic_info(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
