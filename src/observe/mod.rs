//! Property-change notification: event source, weak forwarding, value cell.
//!
//! This module contains the change-notification side of the crate:
//! - [`ChangeEvents`] / [`NotifyChanged`]: the attach/detach capability a
//!   change-notifying source exposes;
//! - [`ChangeForwarder`]: weak-listener adapter between one source and one
//!   callback, with self-healing detach;
//! - [`ObservableValue`]: a minimal named cell that raises change
//!   notifications on real value changes.

mod forwarder;
mod notify;
mod value;

pub use forwarder::ChangeForwarder;
pub use notify::{ChangeEvents, ListenerId, NotifyChanged};
pub use value::ObservableValue;
