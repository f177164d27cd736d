//! Message hub: type-routed delivery with weak subscriber slots.
//!
//! This module contains the hub core. The public API is [`MessageHub`]
//! (routing + lazy registry creation), [`Subscription`] (the disposable
//! token returned by subscribe), and the [`Message`] marker trait.
//!
//! Internal modules:
//! - [`registry`]: per-type weak handler set with snapshot delivery and
//!   lazy compaction;
//! - [`bus`]: the `TypeId` → registry map and publish/subscribe entry
//!   points;
//! - [`subscription`]: token lifecycle (strong anchor + one-shot removal).

mod bus;
mod message;
mod registry;
mod subscription;

pub use bus::MessageHub;
pub use message::Message;
pub use subscription::Subscription;
