//! # Weak change-listener forwarding.
//!
//! Subscribing a long-lived source's change event directly to a callback
//! creates a strong source→callback edge: the callback (and whatever it
//! captures, typically a whole view-model) cannot be dropped while the
//! source lives. [`ChangeForwarder`] breaks that edge.
//!
//! ```text
//!  source.ChangeEvents ──strong──► closure ──weak──► ForwardListener
//!                                                        │ strong
//!                                                        ▼
//!  ChangeForwarder ────────────────strong──────────► callback (+ filter)
//! ```
//!
//! The forwarder is the only strong anchor for the listener. On every
//! notification the attached closure resolves its weak reference:
//! - live → forward the property name through the optional filter to the
//!   callback;
//! - dead → detach the closure from the source on the spot (self-healing
//!   unsubscribe), so a leaked registration costs at most one extra raise.
//!
//! Teardown is exactly-once: explicit [`unsubscribe`](ChangeForwarder::unsubscribe),
//! or drop as an RAII backstop. A raise that resolved the listener just
//! before an unsubscribe may still deliver once; none after that.

use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;

use crate::error::HubError;
use crate::observe::notify::{ChangeEvents, ListenerId, NotifyChanged};

/// Callback plus optional single-property filter, owned by the forwarder
/// and seen weakly by the source-attached closure.
struct ForwardListener {
    filter: Option<Box<str>>,
    callback: Box<dyn Fn(&str) + Send + Sync>,
}

impl ForwardListener {
    fn forward(&self, property: &str) {
        match &self.filter {
            Some(name) if name.as_ref() != property => {}
            _ => (self.callback)(property),
        }
    }
}

/// Weak adapter between a change-notifying source and a callback.
///
/// See the [module docs](self) for the lifetime model. Construct with
/// [`ChangeForwarder::new`] (all properties) or
/// [`ChangeForwarder::for_property`] (single property).
#[must_use = "dropping the forwarder immediately detaches it from the source"]
pub struct ChangeForwarder {
    /// Strong listener anchor; cleared exactly once at teardown.
    listener: Mutex<Option<Arc<ForwardListener>>>,
    /// Source attachment (events + listener id); taken exactly once.
    link: Mutex<Option<(Arc<ChangeEvents>, ListenerId)>>,
}

impl ChangeForwarder {
    /// Forwards every property change of `source` to `callback`.
    ///
    /// The callback receives the property name. Attachment happens
    /// immediately; the source never holds a strong reference to the
    /// callback.
    pub fn new<S, F>(source: &S, callback: F) -> Self
    where
        S: NotifyChanged + ?Sized,
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self::attach_to(source.change_events(), None, Box::new(callback))
    }

    /// Forwards only changes of the named property of `source` to `callback`.
    ///
    /// Fails fast with [`HubError::EmptyPropertyName`] when `property` is
    /// empty.
    pub fn for_property<S, F>(source: &S, property: &str, callback: F) -> Result<Self, HubError>
    where
        S: NotifyChanged + ?Sized,
        F: Fn() + Send + Sync + 'static,
    {
        if property.is_empty() {
            return Err(HubError::EmptyPropertyName);
        }

        Ok(Self::attach_to(
            source.change_events(),
            Some(property.into()),
            Box::new(move |_| callback()),
        ))
    }

    fn attach_to(
        events: &Arc<ChangeEvents>,
        filter: Option<Box<str>>,
        callback: Box<dyn Fn(&str) + Send + Sync>,
    ) -> Self {
        let listener = Arc::new(ForwardListener { filter, callback });
        let weak: Weak<ForwardListener> = Arc::downgrade(&listener);
        let events = Arc::clone(events);

        // The closure needs its own id to self-detach, but the id only
        // exists after attaching; it is published through the cell below.
        let id_cell: Arc<OnceLock<ListenerId>> = Arc::new(OnceLock::new());

        let id = {
            let events_weak = Arc::downgrade(&events);
            let id_cell = Arc::clone(&id_cell);
            events.attach(move |property: &str| match weak.upgrade() {
                Some(listener) => listener.forward(property),
                None => {
                    if let (Some(events), Some(id)) = (events_weak.upgrade(), id_cell.get()) {
                        events.detach(*id);
                    }
                }
            })
        };
        let _ = id_cell.set(id);

        Self {
            listener: Mutex::new(Some(listener)),
            link: Mutex::new(Some((events, id))),
        }
    }

    /// Detaches from the source and clears internal references.
    ///
    /// Idempotent; safe to call multiple times or concurrently with an
    /// in-flight notification.
    pub fn unsubscribe(&self) {
        let link = self.link.lock().take();
        if let Some((events, id)) = link {
            events.detach(id);
        }
        *self.listener.lock() = None;
    }

    /// Consumes the forwarder without detaching from the source.
    ///
    /// The weak closure stays attached; the first raise after this finds
    /// the listener dead and detaches it from the source (self-healing).
    pub fn forget(self) {
        *self.link.lock() = None;
        *self.listener.lock() = None;
    }

    /// Whether the forwarder is still attached to its source.
    pub fn is_attached(&self) -> bool {
        self.link.lock().is_some()
    }
}

impl Drop for ChangeForwarder {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::value::ObservableValue;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    #[test]
    fn test_forwards_every_property_change() {
        let value = ObservableValue::new("Name", String::new());
        let seen = Arc::new(StdMutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        let forwarder = ChangeForwarder::new(&value, move |property: &str| {
            log.lock().unwrap().push(property.to_string());
        });

        value.set("a".to_string());
        value.set("b".to_string());
        assert_eq!(*seen.lock().unwrap(), vec!["Name", "Name"]);

        forwarder.unsubscribe();
        value.set("c".to_string());
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_property_filter_scenario() {
        let events = ChangeEvents::new();
        let calls = Arc::new(AtomicUsize::new(0));

        struct Source {
            events: Arc<ChangeEvents>,
        }
        impl NotifyChanged for Source {
            fn change_events(&self) -> &Arc<ChangeEvents> {
                &self.events
            }
        }
        let source = Source {
            events: Arc::clone(&events),
        };

        let counter = Arc::clone(&calls);
        let forwarder = ChangeForwarder::for_property(&source, "Name", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("non-empty property name");

        events.raise("Name");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        events.raise("Age");
        assert_eq!(calls.load(Ordering::SeqCst), 1, "filtered property must not forward");

        forwarder.unsubscribe();
        events.raise("Name");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            events.listener_count(),
            0,
            "no residual subscription on the source"
        );
    }

    #[test]
    fn test_empty_property_name_fails_fast() {
        let value = ObservableValue::new("Name", 0u32);
        let result = ChangeForwarder::for_property(&value, "", || {});
        assert!(matches!(result, Err(HubError::EmptyPropertyName)));
        assert_eq!(
            value.change_events().listener_count(),
            0,
            "failed construction must not attach"
        );
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let value = ObservableValue::new("Name", 0u32);
        let forwarder = ChangeForwarder::new(&value, |_| {});

        forwarder.unsubscribe();
        forwarder.unsubscribe();
        assert!(!forwarder.is_attached());
        assert_eq!(value.change_events().listener_count(), 0);
    }

    #[test]
    fn test_drop_detaches_from_source() {
        let value = ObservableValue::new("Name", 0u32);
        let forwarder = ChangeForwarder::new(&value, |_| {});
        assert_eq!(value.change_events().listener_count(), 1);

        drop(forwarder);
        assert_eq!(value.change_events().listener_count(), 0);
    }

    #[test]
    fn test_self_healing_detach_after_forget() {
        let value = ObservableValue::new("Name", 0u32);
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let forwarder = ChangeForwarder::new(&value, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // Leak the registration: the listener dies with the forwarder's
        // anchor, but the closure stays attached to the source.
        forwarder.forget();
        assert_eq!(value.change_events().listener_count(), 1);

        // First raise finds the listener dead and detaches on the spot.
        value.set(1);
        assert_eq!(calls.load(Ordering::SeqCst), 0, "dead listener must not forward");
        assert_eq!(
            value.change_events().listener_count(),
            0,
            "self-healing detach must remove the closure"
        );
    }
}
