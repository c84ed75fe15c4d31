//! # Typed channel contracts.
//!
//! A [`Channel`] names a key and declares the argument shape that
//! `publish`/`subscribe` exchange for it:
//!
//! | Shape               | `Id`                      | `Payload`  |
//! |---------------------|---------------------------|------------|
//! | zero arguments      | `()`                      | `()`       |
//! | one payload         | `()`                      | any `T`    |
//! | identifier, payload | `str`, `String`, integers | any `T`    |
//!
//! The shape is enforced at compile time: [`PubSub::publish`](crate::PubSub::publish)
//! and [`PubSub::subscribe`](crate::PubSub::subscribe) only accept channels
//! with `Id = ()`, the `*_to` variants require an identifier.
//!
//! ## Example
//! ```rust
//! use topicbus::{Channel, channel};
//!
//! #[derive(Clone, Debug)]
//! pub struct User { pub name: String }
//!
//! channel!(pub Ping: "ping" => u32);
//! channel!(pub Tick: "tick" => ());
//! channel!(pub UserUpdated: "userUpdated" [str] => User);
//!
//! assert_eq!(<Ping as Channel>::KEY, "ping");
//! assert_eq!(<UserUpdated as Channel>::KEY, "userUpdated");
//! ```

use super::topic::TopicId;

/// Static contract for one channel key.
pub trait Channel: 'static {
    /// Channel key; the topic for unqualified channels.
    const KEY: &'static str;

    /// Identifier qualifying the topic; `()` for unqualified channels.
    type Id: TopicId + ?Sized;

    /// Payload carried by each event.
    type Payload: Clone + Send + Sync + 'static;
}

/// Declares a unit struct implementing [`Channel`].
///
/// ```rust
/// use topicbus::channel;
///
/// channel!(
///     /// Fired on every heartbeat.
///     pub Heartbeat: "heartbeat" => u64
/// );
/// channel!(pub OrderPaid: "orderPaid" [u64] => String);
/// ```
#[macro_export]
macro_rules! channel {
    ($(#[$meta:meta])* $vis:vis $name:ident : $key:literal => $payload:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        impl $crate::Channel for $name {
            const KEY: &'static str = $key;
            type Id = ();
            type Payload = $payload;
        }
    };
    ($(#[$meta:meta])* $vis:vis $name:ident : $key:literal [$id:ty] => $payload:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        impl $crate::Channel for $name {
            const KEY: &'static str = $key;
            type Id = $id;
            type Payload = $payload;
        }
    };
}
