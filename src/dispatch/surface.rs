//! # Dispatch surface (topic registry capability).
//!
//! [`Dispatch`] is the shared, topic-keyed registration and delivery
//! mechanism the engine is built on. The crate ships an in-memory
//! implementation ([`LocalDispatch`](crate::LocalDispatch), feature `local`);
//! callers can supply any other implementation, including a distributed one.
//!
//! ## Contract
//! - `add_listener` / `remove_listener` are keyed by topic and listener identity.
//! - `dispatch` is **synchronous**: every listener registered for the event's
//!   exact topic runs, in registration order, before it returns.
//! - Dispatching to a topic with no listeners is a no-op.
//! - Implementations must tolerate reentrant calls from inside a listener
//!   without corrupting the listener sets of other topics.
//! - No assumptions about topic-string length or listener count limits.

use std::sync::Arc;

use super::event::Event;
use super::listener::ListenerRef;
use crate::channels::Topic;

/// Topic-keyed listener registry with synchronous fan-out.
pub trait Dispatch: Send + Sync + 'static {
    /// Registers `listener` for `topic`.
    ///
    /// Returns `false` if that exact listener is already registered on the topic.
    fn add_listener(&self, topic: &Topic, listener: ListenerRef) -> bool;

    /// Removes `listener` from `topic`; returns `true` if it was registered.
    fn remove_listener(&self, topic: &Topic, listener: &ListenerRef) -> bool;

    /// Delivers `event` to every listener currently registered on `event.topic`.
    fn dispatch(&self, event: &Event);

    /// Number of listeners currently registered on `topic`.
    fn listener_count(&self, topic: &Topic) -> usize;
}

/// Shared dispatch handle.
pub type DispatchRef = Arc<dyn Dispatch>;

impl<D: Dispatch> Dispatch for Arc<D> {
    fn add_listener(&self, topic: &Topic, listener: ListenerRef) -> bool {
        (**self).add_listener(topic, listener)
    }

    fn remove_listener(&self, topic: &Topic, listener: &ListenerRef) -> bool {
        (**self).remove_listener(topic, listener)
    }

    fn dispatch(&self, event: &Event) {
        (**self).dispatch(event)
    }

    fn listener_count(&self, topic: &Topic) -> usize {
        (**self).listener_count(topic)
    }
}
