//! Marker trait for values routable through the hub.

use std::any::Any;

/// Marker trait for types that can be published on a [`MessageHub`](crate::MessageHub).
///
/// Any type that is `Send + Sync + 'static` automatically implements this
/// trait, so plain user structs are messages without further ceremony.
/// Routing is by the concrete type's [`TypeId`](std::any::TypeId) only.
pub trait Message: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Message for T {}
