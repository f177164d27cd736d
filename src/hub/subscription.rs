//! Subscription token returned by [`MessageHub::subscribe`](crate::MessageHub::subscribe).

use std::any::Any;

/// Disposable handle for one active subscription.
///
/// The token is the strong anchor for its handler: the hub itself holds only
/// a weak reference, so the handler stays alive exactly as long as the token
/// (or any other owner of the handler `Arc`) does.
///
/// Teardown paths:
/// - [`Subscription::unsubscribe`] — removes exactly the slot this token was
///   issued for; idempotent;
/// - drop — same as `unsubscribe` (RAII);
/// - [`Subscription::forget`] — keeps the slot registered but drops the
///   anchor, leaving the handler's liveness to other `Arc` owners; once they
///   are gone the slot goes dead and is compacted lazily.
#[must_use = "dropping the token immediately unsubscribes the handler"]
pub struct Subscription {
    /// Strong handler reference; keeps the weak slot resolvable.
    anchor: Option<Box<dyn Any + Send>>,
    /// One-shot slot removal.
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub(crate) fn new(anchor: Box<dyn Any + Send>, cancel: Box<dyn FnOnce() + Send>) -> Self {
        Self {
            anchor: Some(anchor),
            cancel: Some(cancel),
        }
    }

    /// Removes this subscription's slot from its registry.
    ///
    /// Calling it again (or dropping the token afterwards) is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
        self.anchor = None;
    }

    /// Consumes the token without unsubscribing.
    ///
    /// The slot stays registered; the handler keeps receiving messages while
    /// any other strong reference to it exists, and the slot is cleaned up
    /// lazily once the last one is dropped.
    pub fn forget(mut self) {
        self.cancel = None;
        self.anchor = None;
    }

    /// Whether this token still owns an active subscription.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
