//! # topicbus
//!
//! **Topicbus** is a typed, in-process publish/subscribe bridge for Rust.
//!
//! It turns synchronous "event fired" notifications into lazily consumed
//! async streams, one per subscriber, multiplexed by topic. Channels are
//! declared statically (key + argument shape), so mismatched publish and
//! subscribe calls fail to compile.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   publish::<C>(payload)            subscribe::<C>() / subscribe_to::<C>(&id)
//!   publish_to::<C>(&id, payload)                 │
//!          │                                      ▼
//!          │ resolve topic                 ┌──────────────┐
//!          │ "key" | "key:id"              │ Subscription │ (lazy Stream)
//!          ▼                               └──────┬───────┘
//!     Event { topic, data, seq }                  │ first poll: add_listener
//!          │                                      ▼
//! ┌────────┴────────────────────────────────────────────────────────┐
//! │  Dispatch (shared, topic-keyed; LocalDispatch by default)       │
//! │  dispatch(event) ─► every listener on event.topic, in order     │
//! └────────┬──────────────────────┬──────────────────────┬──────────┘
//!          ▼                      ▼                      ▼
//!    QueueListener 1        QueueListener 2        QueueListener N
//!          │                      │                      │
//!          ▼                      ▼                      ▼
//!    [queue] ─► next()      [queue] ─► next()      [queue] ─► HandlerSet worker
//! ```
//!
//! ### Lifecycle
//! ```text
//! subscribe() ──► Created ──(poll / activate)──► Listening ──(cancel | token | drop)──► Cancelled
//!                                                    │                                    │
//!                                                    └─ yields payloads in publish order  └─ listener removed once
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                          |
//! |-------------------|----------------------------------------------------------------|---------------------------------------------|
//! | **Channels**      | Static key + argument shape, topic resolution.                 | [`Channel`], [`channel!`], [`Topic`]        |
//! | **Engine**        | Publish fan-out, lazy cancellable subscriptions.               | [`PubSub`], [`Subscription`]                |
//! | **Dispatch**      | Pluggable topic registry with synchronous delivery.            | [`Dispatch`], [`Listener`], [`Event`]       |
//! | **Handlers**      | Background consumers with panic isolation.                     | [`Handler`], [`HandlerFn`], [`HandlerSet`]  |
//! | **Errors**        | Setup-time failure when no dispatch surface is available.      | [`PubSubError`]                             |
//! | **Configuration** | Per-subscription buffering policy.                             | [`Config`], [`BufferPolicy`]                |
//!
//! ## Optional features
//! - `local` _(default)_: in-memory [`LocalDispatch`], used when no dispatch is supplied.
//! - `logging`: exports a simple built-in [`LogHandler`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use futures::StreamExt;
//! use topicbus::{PubSub, channel};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct User { name: String }
//!
//! channel!(Ping: "ping" => u32);
//! channel!(UserUpdated: "userUpdated" [str] => User);
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = PubSub::new();
//!
//!     let mut pings = bus.subscribe::<Ping>();
//!     let mut u1 = bus.subscribe_to::<UserUpdated>("u1");
//!     pings.activate();
//!     u1.activate();
//!
//!     bus.publish::<Ping>(42);
//!     bus.publish_to::<UserUpdated>("u2", User { name: "B".into() }); // nobody listens: dropped
//!     bus.publish_to::<UserUpdated>("u1", User { name: "A".into() });
//!
//!     assert_eq!(pings.next().await, Some(42));
//!     assert_eq!(u1.next().await, Some(User { name: "A".into() }));
//!
//!     u1.cancel();
//!     assert_eq!(u1.next().await, None);
//! }
//! ```
mod channels;
mod core;
mod dispatch;
mod error;
mod handlers;

// ---- Public re-exports ----

pub use channels::{Channel, Topic, TopicId};
pub use crate::core::{BufferPolicy, Config, PubSub, PubSubBuilder, Subscription, SubscriptionState};
pub use dispatch::{
    Dispatch, DispatchRef, Event, EventData, Listener, ListenerFn, ListenerRef, same_listener,
};
pub use error::PubSubError;
pub use handlers::{Handler, HandlerFn, HandlerSet};

// Default in-memory dispatch surface.
// Disable with: `--no-default-features`
#[cfg(feature = "local")]
pub use dispatch::LocalDispatch;

// Optional: expose a simple built-in logger handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::LogHandler;
