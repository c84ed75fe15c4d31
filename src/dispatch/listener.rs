//! # Listener capability.
//!
//! A [`Listener`] is a single synchronous callback invoked with each
//! [`Event`] dispatched on the topic it is registered for.
//!
//! Listeners are registered and removed **by identity**: the identity of a
//! [`ListenerRef`] is its `Arc` allocation, so the same `Arc` (or a clone of
//! it) must be passed back to remove it. See [`same_listener`].
//!
//! ## Rules
//! - Callbacks run inside `dispatch`, on the publisher's stack.
//! - Callbacks may reentrantly publish, subscribe or remove listeners.
//! - Callbacks must not block; hand work off to a queue instead.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use topicbus::{Event, ListenerFn, ListenerRef, Topic};
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&hits);
//! let listener: ListenerRef = ListenerFn::arc("counter", move |_ev: &Event| {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! listener.on_event(&Event::new(Topic::new("ping"), ()));
//! assert_eq!(hits.load(Ordering::Relaxed), 1);
//! assert_eq!(listener.name(), "counter");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::event::Event;

/// Synchronous event callback.
pub trait Listener: Send + Sync + 'static {
    /// Handles one dispatched event.
    fn on_event(&self, event: &Event);

    /// Returns the listener name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared listener handle; its allocation is its identity.
pub type ListenerRef = Arc<dyn Listener>;

/// Returns true if both handles point at the same listener.
///
/// Compares data pointers only, so two handles coerced from the same `Arc`
/// through different vtables still compare equal.
#[inline]
pub fn same_listener(a: &ListenerRef, b: &ListenerRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Closure-backed listener.
pub struct ListenerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ListenerFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    /// Creates a new closure-backed listener.
    ///
    /// Prefer [`ListenerFn::arc`] when you immediately need a [`ListenerRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> ListenerRef {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Listener for ListenerFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event) {
        (self.f)(event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for ListenerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerFn").field("name", &self.name).finish()
    }
}
