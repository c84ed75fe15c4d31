//! # Payload handler trait.
//!
//! Provides [`Handler`] an extension point for consuming a subscription in
//! the background instead of pulling it by hand.
//!
//! Each attached handler gets:
//! - **Dedicated worker task** (runs independently)
//! - **Its own subscription queue** (buffer policy of the subscription)
//! - **Panic isolation** (panics are caught and logged, the worker keeps going)
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use topicbus::Handler;
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Handler<String> for Audit {
//!     async fn handle(&self, payload: String) {
//!         let _ = payload; // write to the audit log, etc.
//!     }
//!
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

/// Asynchronous consumer of payloads of type `T`.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing only grows this handler's own queue.
#[async_trait]
pub trait Handler<T: Send + 'static>: Send + Sync + 'static {
    /// Processes one payload.
    ///
    /// Called from the handler's worker task, never on the publisher's stack.
    /// Payloads are delivered in publish order.
    async fn handle(&self, payload: T);

    /// Returns the handler name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed handler.
///
/// Wraps `F: Fn(T) -> Fut`, producing a fresh future per payload.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use topicbus::{Handler, HandlerFn};
///
/// let h: Arc<dyn Handler<u32>> = HandlerFn::arc("printer", |v: u32| async move {
///     println!("got {v}");
/// });
/// assert_eq!(h.name(), "printer");
/// ```
pub struct HandlerFn<F> {
    name: &'static str,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new closure-backed handler.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<T, F, Fut> Handler<T> for HandlerFn<F>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle(&self, payload: T) {
        (self.f)(payload).await
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
