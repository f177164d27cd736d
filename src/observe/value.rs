//! Named observable cell with change-on-real-change semantics.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::observe::notify::{ChangeEvents, NotifyChanged};

/// A single named value that raises a change notification when assigned a
/// value different from the current one.
///
/// Assignment with an equal value is a no-op and raises nothing, so
/// listeners only ever see real changes.
///
/// # Example
/// ```rust
/// use msghub::{ChangeForwarder, ObservableValue};
///
/// let name = ObservableValue::new("Name", String::from("initial"));
/// let _fwd = ChangeForwarder::new(&name, |property| {
///     println!("{property} changed");
/// });
///
/// assert!(name.set(String::from("updated")));   // raises "Name"
/// assert!(!name.set(String::from("updated")));  // equal: no notification
/// ```
pub struct ObservableValue<T> {
    name: Arc<str>,
    value: RwLock<T>,
    events: Arc<ChangeEvents>,
}

impl<T: Clone + PartialEq> ObservableValue<T> {
    /// Creates a cell named `name` holding `initial`.
    pub fn new(name: impl Into<Arc<str>>, initial: T) -> Self {
        Self {
            name: name.into(),
            value: RwLock::new(initial),
            events: ChangeEvents::new(),
        }
    }

    /// The property name raised on changes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Stores `value` and notifies listeners, unless it equals the current
    /// value. Returns whether the value actually changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.value.write();
            if *current == value {
                return false;
            }
            *current = value;
        }
        // Raised outside the value lock so listeners may call `get`.
        self.events.raise(&self.name);
        true
    }
}

impl<T> NotifyChanged for ObservableValue<T> {
    fn change_events(&self) -> &Arc<ChangeEvents> {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_set_raises_only_on_real_change() {
        let value = ObservableValue::new("Count", 0u32);
        let raises = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&raises);
        let _id = value.change_events().attach(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(value.set(1));
        assert!(!value.set(1), "equal assignment must report no change");
        assert!(value.set(2));

        assert_eq!(raises.load(Ordering::SeqCst), 2);
        assert_eq!(value.get(), 2);
    }

    #[test]
    fn test_listener_may_read_during_notification() {
        let value = Arc::new(ObservableValue::new("Count", 0u32));
        let observed = Arc::new(AtomicUsize::new(usize::MAX));

        let cell = Arc::clone(&value);
        let seen = Arc::clone(&observed);
        let _id = value.change_events().attach(move |_| {
            seen.store(cell.get() as usize, Ordering::SeqCst);
        });

        value.set(7);
        assert_eq!(observed.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_name_is_exposed() {
        let value = ObservableValue::new("Title", String::new());
        assert_eq!(value.name(), "Title");
    }
}
