//! Dispatch surface: events, listeners and topic-keyed delivery.
//!
//! This module groups the event **data model**, the **listener** capability
//! and the **registry** the engine publishes through.
//!
//! ## Contents
//! - [`Event`] topic + type-erased payload + sequence number
//! - [`Listener`], [`ListenerFn`], [`ListenerRef`] synchronous callbacks, identity by `Arc`
//! - [`Dispatch`] register / remove / dispatch by topic
//! - [`LocalDispatch`] in-memory default (feature `local`)
//!
//! ## Quick reference
//! - **Publishers**: [`PubSub::publish`](crate::PubSub::publish) builds an [`Event`]
//!   and calls [`Dispatch::dispatch`].
//! - **Listeners**: each [`Subscription`](crate::Subscription) owns exactly one
//!   listener registration for its lifetime.

mod event;
mod listener;
#[cfg(feature = "local")]
mod local;
mod surface;

pub use event::{Event, EventData};
pub use listener::{Listener, ListenerFn, ListenerRef, same_listener};
#[cfg(feature = "local")]
pub use local::LocalDispatch;
pub use surface::{Dispatch, DispatchRef};
