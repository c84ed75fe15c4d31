//! # PubSub: typed publish/subscribe over a dispatch surface.
//!
//! [`PubSub`] turns synchronous dispatch into per-subscriber async streams:
//! - `publish*` builds an [`Event`] and dispatches it synchronously; every
//!   listener on the resolved topic runs before `publish` returns.
//! - `subscribe*` returns a lazy [`Subscription`] that registers one listener
//!   on first poll and yields payloads until cancelled.
//!
//! ## Rules
//! - **Fire-and-forget**: publishing with no subscribers is a silent no-op;
//!   nothing is stored or replayed.
//! - **Topic isolation**: `key:a` subscribers never see `key:b` events.
//! - **Fan-out**: every subscription on a topic receives every payload
//!   published after it started listening.
//! - **Per-topic ordering**: payloads are observed in publish order. No
//!   ordering across topics.
//!
//! ## Example
//! ```rust
//! use futures::StreamExt;
//! use topicbus::{PubSub, channel};
//!
//! channel!(Ping: "ping" => u32);
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = PubSub::new();
//! let mut pings = bus.subscribe::<Ping>();
//! pings.activate();
//!
//! bus.publish::<Ping>(42);
//! assert_eq!(pings.next().await, Some(42));
//! # }
//! ```

use std::any::Any;
use std::fmt;

use super::builder::PubSubBuilder;
use super::config::{BufferPolicy, Config};
use super::subscription::Subscription;
use crate::channels::{Channel, Topic, TopicId};
use crate::dispatch::{Dispatch, DispatchRef, Event};

/// Typed publish/subscribe engine.
///
/// Cheap to clone: clones share the same dispatch surface.
#[derive(Clone)]
pub struct PubSub {
    dispatch: DispatchRef,
    cfg: Config,
}

impl PubSub {
    /// Creates an engine over a fresh in-memory [`LocalDispatch`](crate::LocalDispatch)
    /// with the default [`Config`].
    #[cfg(feature = "local")]
    pub fn new() -> Self {
        Self::new_internal(
            std::sync::Arc::new(crate::dispatch::LocalDispatch::new()),
            Config::default(),
        )
    }

    /// Returns a builder to supply a custom dispatch surface or config.
    pub fn builder(cfg: Config) -> PubSubBuilder {
        PubSubBuilder::new(cfg)
    }

    pub(crate) fn new_internal(dispatch: DispatchRef, cfg: Config) -> Self {
        Self { dispatch, cfg }
    }

    /// Publishes `payload` on an unqualified channel.
    pub fn publish<C>(&self, payload: C::Payload)
    where
        C: Channel<Id = ()>,
    {
        self.publish_topic(().topic(C::KEY), payload);
    }

    /// Publishes `payload` on the topic `C::KEY:id`.
    pub fn publish_to<C: Channel>(&self, id: &C::Id, payload: C::Payload) {
        self.publish_topic(id.topic(C::KEY), payload);
    }

    /// Publishes an arbitrary payload on an already resolved topic.
    pub fn publish_topic<T>(&self, topic: Topic, payload: T)
    where
        T: Any + Send + Sync,
    {
        let event = Event::new(topic, payload);
        tracing::trace!(topic = %event.topic, seq = event.seq, "publish");
        self.dispatch.dispatch(&event);
    }

    /// Subscribes to an unqualified channel.
    pub fn subscribe<C>(&self) -> Subscription<C::Payload>
    where
        C: Channel<Id = ()>,
    {
        self.subscribe_topic(().topic(C::KEY), self.cfg.buffer)
    }

    /// Subscribes to the topic `C::KEY:id`.
    pub fn subscribe_to<C: Channel>(&self, id: &C::Id) -> Subscription<C::Payload> {
        self.subscribe_topic(id.topic(C::KEY), self.cfg.buffer)
    }

    /// Subscribes to an already resolved topic with an explicit buffer policy.
    ///
    /// Events on `topic` whose payload is not a `T` are skipped (and logged).
    pub fn subscribe_topic<T>(&self, topic: Topic, buffer: BufferPolicy) -> Subscription<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        Subscription::new(self.dispatch.clone(), topic, buffer)
    }

    /// Number of listeners currently registered on `topic`.
    pub fn listener_count(&self, topic: &Topic) -> usize {
        self.dispatch.listener_count(topic)
    }

    /// Underlying dispatch surface.
    pub fn dispatch(&self) -> &DispatchRef {
        &self.dispatch
    }

    /// Engine configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }
}

#[cfg(feature = "local")]
impl Default for PubSub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PubSub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PubSub")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}
