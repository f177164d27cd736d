//! # Property-change event source.
//!
//! [`ChangeEvents`] is the capability a change-notifying object exposes:
//! an attach/detach pair for listeners interested in named property
//! changes, plus [`raise`](ChangeEvents::raise) for the owning source to
//! fire. Sources embed one behind an `Arc` and hand it out through
//! [`NotifyChanged`].
//!
//! Delivery follows the same discipline as the hub registries: listeners
//! are snapshotted under the read lock and invoked outside it, so a
//! listener may detach (itself or others) during a raise without
//! deadlocking. A listener detached mid-raise can still see that raise if
//! it was part of the snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Identifier for one attached change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ChangeListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Attach/detach/raise event source for named property changes.
pub struct ChangeEvents {
    listeners: RwLock<Vec<(ListenerId, ChangeListener)>>,
    next_id: AtomicU64,
}

impl ChangeEvents {
    /// Creates a new event source, ready to embed in a notifying object.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        })
    }

    /// Attaches a listener; it will be called with the property name on
    /// every subsequent [`raise`](Self::raise).
    pub fn attach<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Detaches the listener with the given id. Unknown ids are a no-op.
    pub fn detach(&self, id: ListenerId) {
        self.listeners
            .write()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    /// Notifies all currently-attached listeners that `property` changed.
    pub fn raise(&self, property: &str) {
        let snapshot: Vec<ChangeListener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            (*listener)(property);
        }
    }

    /// Number of currently-attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

/// Capability trait for objects that notify about property changes.
///
/// Implementors expose their embedded [`ChangeEvents`];
/// [`ChangeForwarder`](crate::ChangeForwarder) consumes this seam.
pub trait NotifyChanged {
    fn change_events(&self) -> &Arc<ChangeEvents>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[test]
    fn test_attach_raise_detach() {
        let events = ChangeEvents::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let id = events.attach(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(events.listener_count(), 1);

        events.raise("Name");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        events.detach(id);
        assert_eq!(events.listener_count(), 0);
        events.raise("Name");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_receives_property_name() {
        let events = ChangeEvents::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        let _id = events.attach(move |property| {
            log.lock().unwrap().push(property.to_string());
        });

        events.raise("Name");
        events.raise("Age");
        assert_eq!(*seen.lock().unwrap(), vec!["Name", "Age"]);
    }

    #[test]
    fn test_listener_may_detach_during_raise() {
        let events = ChangeEvents::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let counting = events.attach(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // Detaches the counting listener from inside a raise.
        let events_ref = Arc::clone(&events);
        let _detacher = events.attach(move |_| {
            events_ref.detach(counting);
        });

        // Must not deadlock. The counting listener was in the first raise's
        // snapshot (it runs before the detacher), then never again.
        events.raise("Name");
        events.raise("Name");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(events.listener_count(), 1);
    }
}
