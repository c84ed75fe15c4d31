//! Engine core: publish, subscribe and subscription lifecycle.
//!
//! The public API from this module is [`PubSub`] (plus its builder and
//! config) and the [`Subscription`] stream it hands out.
//!
//! Internal modules:
//! - [`pubsub`]: topic resolution, publish fan-out, subscription factory;
//! - [`subscription`]: lazy registration, per-subscription queue, exactly-once teardown;
//! - [`builder`]: factory with optional custom dispatch surface;
//! - [`config`]: buffering policy and defaults.

mod builder;
mod config;
mod pubsub;
mod subscription;

pub use builder::PubSubBuilder;
pub use config::{BufferPolicy, Config};
pub use pubsub::PubSub;
pub use subscription::{Subscription, SubscriptionState};
