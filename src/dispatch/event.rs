//! # Events dispatched on a topic.
//!
//! An [`Event`] is built fresh for every publish and carries:
//! - the resolved [`Topic`] it is dispatched on,
//! - the payload (`data`), type-erased so one dispatch surface serves every channel,
//! - a globally unique sequence number (`seq`).
//!
//! ## Ordering guarantees
//! `seq` increases monotonically across the process. Within one topic,
//! listeners already observe events in publish order; `seq` is useful for
//! correlating events across topics in logs.
//!
//! ## Example
//! ```rust
//! use topicbus::{Event, Topic};
//!
//! let ev = Event::new(Topic::new("ping"), 42u32);
//!
//! assert_eq!(ev.topic.as_str(), "ping");
//! assert_eq!(ev.data::<u32>(), Some(&42));
//! assert_eq!(ev.data::<String>(), None);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::channels::Topic;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Type-erased payload shared by every listener of one dispatch.
pub type EventData = Arc<dyn Any + Send + Sync>;

/// Ephemeral value carrying a topic and its payload.
#[derive(Clone)]
pub struct Event {
    /// Topic the event is dispatched on.
    pub topic: Topic,
    /// Payload; every listener receives the same shared reference.
    pub data: EventData,
    /// Global sequence number.
    pub seq: u64,
}

impl Event {
    /// Creates an event for `topic` carrying `data`.
    pub fn new<T>(topic: Topic, data: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::from_shared(topic, Arc::new(data))
    }

    /// Creates an event from an already shared payload.
    pub fn from_shared(topic: Topic, data: EventData) -> Self {
        Self {
            topic,
            data,
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
        }
    }

    /// Downcasts the payload, `None` if it is not a `T`.
    #[inline]
    pub fn data<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("topic", &self.topic)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}
