//! # Engine configuration.
//!
//! Provides [`Config`] centralized settings for a [`PubSub`](crate::PubSub)
//! instance, and [`BufferPolicy`] which decides what a subscription does with
//! payloads its consumer has not pulled yet.
//!
//! ## Sentinel values
//! - `BufferPolicy::Bounded { capacity: 0 }` → clamped to a capacity of 1
//! - `BufferPolicy::Bounded { capacity }` above [`Semaphore::MAX_PERMITS`] →
//!   clamped to `Semaphore::MAX_PERMITS` (the largest queue tokio accepts)

use tokio::sync::Semaphore;

/// Per-subscription buffering of payloads not yet pulled by the consumer.
///
/// ## Variants
/// - `Unbounded` (default): nothing is ever dropped; a consumer that never
///   catches up grows its queue without limit.
/// - `Bounded { capacity }`: at most `capacity` payloads are queued; when full
///   the **newest** payload is dropped for this subscription only and a warning
///   is logged. Other subscriptions on the same topic are unaffected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BufferPolicy {
    /// Queue every payload until it is consumed.
    #[default]
    Unbounded,
    /// Queue at most `capacity` payloads, dropping new ones when full.
    Bounded {
        /// Maximum number of queued payloads (min 1, max `Semaphore::MAX_PERMITS`).
        capacity: usize,
    },
}

impl BufferPolicy {
    /// Returns the queue capacity as an `Option`, clamped to
    /// `1..=Semaphore::MAX_PERMITS`.
    ///
    /// - `None` → unbounded
    /// - `Some(n)` → at most `n` queued payloads
    #[inline]
    pub fn capacity(&self) -> Option<usize> {
        match self {
            BufferPolicy::Unbounded => None,
            BufferPolicy::Bounded { capacity } => {
                Some((*capacity).clamp(1, Semaphore::MAX_PERMITS))
            }
        }
    }
}

/// Configuration for a [`PubSub`](crate::PubSub) instance.
///
/// ## Field semantics
/// - `buffer`: buffering applied to every subscription created through the
///   typed `subscribe*` methods (override per call with
///   [`PubSub::subscribe_topic`](crate::PubSub::subscribe_topic))
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Default buffering policy for subscriptions.
    pub buffer: BufferPolicy,
}

impl Config {
    /// Returns a config with the given default buffer policy.
    pub fn with_buffer(mut self, buffer: BufferPolicy) -> Self {
        self.buffer = buffer;
        self
    }
}
