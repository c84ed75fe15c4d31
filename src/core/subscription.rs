//! # Subscriptions: lazy, cancellable payload streams.
//!
//! A [`Subscription`] owns exactly one listener registration on one topic.
//! The listener pushes every matching payload into a queue owned by the
//! subscription; the consumer pulls payloads through [`Stream`].
//!
//! ## Lifecycle
//! ```text
//! Created ──(first poll / activate)──► Listening ──(cancel)──► Cancelled
//!    │                                                            ▲
//!    └──────────────────────(cancel before first poll)────────────┘
//! ```
//! - **Created**: nothing registered yet; events published now are not seen.
//! - **Listening**: listener registered; payloads queue up until pulled.
//! - **Cancelled**: listener removed exactly once, queue discarded, every
//!   further poll yields `None`.
//!
//! The stream never ends on its own. Cancellation happens through
//! [`Subscription::cancel`], through the [`CancellationToken`] returned by
//! [`Subscription::cancel_token`], or by dropping the subscription.
//!
//! ## Architecture
//! ```text
//! Dispatch ──► QueueListener.on_event(&Event)
//!                  │ downcast data::<T>() + clone
//!                  ▼
//!             [inbox queue] ──► poll_next() ──► consumer
//!          (unbounded / bounded)
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use futures::stream::FusedStream;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use super::config::BufferPolicy;
use crate::channels::Topic;
use crate::dispatch::{Dispatch, DispatchRef, Event, Listener, ListenerRef};

/// Lifecycle state of a [`Subscription`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Not yet polled; no listener registered.
    Created,
    /// Listener registered; payloads are being queued.
    Listening,
    /// Listener removed; the stream is permanently exhausted.
    Cancelled,
}

/// Producer half of a subscription queue, held by the listener.
enum Outbox<T> {
    Unbounded(mpsc::UnboundedSender<T>),
    Bounded(mpsc::Sender<T>),
}

/// Consumer half of a subscription queue, held by the subscription.
enum Inbox<T> {
    Unbounded(mpsc::UnboundedReceiver<T>),
    Bounded(mpsc::Receiver<T>),
}

fn queue<T>(policy: BufferPolicy) -> (Outbox<T>, Inbox<T>) {
    match policy.capacity() {
        None => {
            let (tx, rx) = mpsc::unbounded_channel();
            (Outbox::Unbounded(tx), Inbox::Unbounded(rx))
        }
        Some(cap) => {
            let (tx, rx) = mpsc::channel(cap);
            (Outbox::Bounded(tx), Inbox::Bounded(rx))
        }
    }
}

impl<T> Inbox<T> {
    fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<T>> {
        match self {
            Inbox::Unbounded(rx) => rx.poll_recv(cx),
            Inbox::Bounded(rx) => rx.poll_recv(cx),
        }
    }

    fn len(&self) -> usize {
        match self {
            Inbox::Unbounded(rx) => rx.len(),
            Inbox::Bounded(rx) => rx.len(),
        }
    }

    /// Closes the queue and drops everything still buffered.
    fn close(&mut self) {
        match self {
            Inbox::Unbounded(rx) => {
                rx.close();
                while rx.try_recv().is_ok() {}
            }
            Inbox::Bounded(rx) => {
                rx.close();
                while rx.try_recv().is_ok() {}
            }
        }
    }
}

/// Listener that forwards payloads of type `T` into a subscription queue.
///
/// Once the subscription's token is cancelled it stops queueing and removes
/// itself from the surface on the next event it sees.
struct QueueListener<T> {
    topic: Topic,
    outbox: Outbox<T>,
    token: CancellationToken,
    dispatch: Weak<dyn Dispatch>,
    this: Weak<QueueListener<T>>,
}

impl<T> QueueListener<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn deregister(&self) {
        let (Some(dispatch), Some(this)) = (self.dispatch.upgrade(), self.this.upgrade()) else {
            return;
        };
        let this: ListenerRef = this;
        if dispatch.remove_listener(&self.topic, &this) {
            tracing::debug!(topic = %self.topic, "listener removed after token cancellation");
        }
    }
}

impl<T> Listener for QueueListener<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event) {
        if self.token.is_cancelled() {
            self.deregister();
            return;
        }
        let Some(payload) = event.data::<T>() else {
            tracing::warn!(
                topic = %self.topic,
                seq = event.seq,
                expected = std::any::type_name::<T>(),
                "payload type mismatch, event dropped for this subscription"
            );
            return;
        };

        match &self.outbox {
            // Closed only after cancellation; the event is meant to be lost then.
            Outbox::Unbounded(tx) => {
                let _ = tx.send(payload.clone());
            }
            Outbox::Bounded(tx) => match tx.try_send(payload.clone()) {
                Ok(()) | Err(mpsc::error::TrySendError::Closed(_)) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        topic = %self.topic,
                        seq = event.seq,
                        "subscription buffer full, newest payload dropped"
                    );
                }
            },
        }
    }

    fn name(&self) -> &str {
        "subscription"
    }
}

/// Lazy, logically infinite stream of payloads published on one topic.
///
/// Created by [`PubSub::subscribe`](crate::PubSub::subscribe) and friends.
/// Each call returns an independent instance with its own listener, queue
/// and cancellation lifecycle.
///
/// ### Properties
/// - **Lazy**: the listener is registered on the first poll (or [`activate`](Self::activate)).
/// - **Ordered**: payloads are yielded in dispatch order, untransformed.
/// - **Exactly-once teardown**: the listener is removed once, however
///   cancellation happens (explicit, token, drop).
pub struct Subscription<T> {
    topic: Topic,
    dispatch: DispatchRef,
    listener: ListenerRef,
    inbox: Inbox<T>,
    state: SubscriptionState,
    token: CancellationToken,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
}

impl<T> Subscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(dispatch: DispatchRef, topic: Topic, buffer: BufferPolicy) -> Self {
        let (outbox, inbox) = queue::<T>(buffer);
        let token = CancellationToken::new();
        let listener: ListenerRef = Arc::new_cyclic(|this| QueueListener {
            topic: topic.clone(),
            outbox,
            token: token.clone(),
            dispatch: Arc::downgrade(&dispatch),
            this: this.clone(),
        });
        let cancelled = Box::pin(token.clone().cancelled_owned());

        Self {
            topic,
            dispatch,
            listener,
            inbox,
            state: SubscriptionState::Created,
            token,
            cancelled,
        }
    }
}

impl<T> Subscription<T> {
    /// Topic this subscription listens on.
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// Number of payloads queued and not yet pulled.
    ///
    /// Zero once the subscription is cancelled, including through its token:
    /// whatever is still queued will never be yielded.
    pub fn queued(&self) -> usize {
        if self.token.is_cancelled() {
            return 0;
        }
        self.inbox.len()
    }

    /// Token that cancels this subscription when triggered.
    ///
    /// Cancelling it from elsewhere (another task, a shutdown hook) stops
    /// queueing at once. The listener leaves the dispatch surface on the next
    /// event published to the topic or the next poll, whichever comes first;
    /// a consumer parked on the stream is woken and sees `None`.
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Registers the listener now instead of on the first poll.
    ///
    /// Events published after this call are queued even if the stream has not
    /// been polled yet. No-op unless the subscription is still `Created`.
    pub fn activate(&mut self) {
        if self.state != SubscriptionState::Created {
            return;
        }
        if self.token.is_cancelled() {
            self.teardown();
            return;
        }
        self.dispatch
            .add_listener(&self.topic, Arc::clone(&self.listener));
        self.state = SubscriptionState::Listening;
        tracing::debug!(topic = %self.topic, "subscription listening");
    }

    /// Cancels the subscription: removes its listener and discards queued payloads.
    ///
    /// Idempotent; the listener is removed at most once.
    pub fn cancel(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        match self.state {
            SubscriptionState::Cancelled => return,
            SubscriptionState::Listening => {
                let removed = self.dispatch.remove_listener(&self.topic, &self.listener);
                tracing::debug!(topic = %self.topic, removed, "subscription cancelled");
            }
            SubscriptionState::Created => {
                tracing::debug!(topic = %self.topic, "subscription cancelled before first poll");
            }
        }
        self.state = SubscriptionState::Cancelled;
        self.token.cancel();
        self.inbox.close();
    }
}

impl<T> Unpin for Subscription<T> {}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();

        if this.state == SubscriptionState::Cancelled {
            return Poll::Ready(None);
        }
        if this.cancelled.as_mut().poll(cx).is_ready() {
            this.teardown();
            return Poll::Ready(None);
        }
        if this.state == SubscriptionState::Created {
            this.activate();
        }

        match this.inbox.poll_recv(cx) {
            Poll::Ready(Some(payload)) => Poll::Ready(Some(payload)),
            // Only reachable if the dispatch surface dropped our listener.
            Poll::Ready(None) => {
                this.teardown();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            SubscriptionState::Cancelled => (0, Some(0)),
            _ => (self.queued(), None),
        }
    }
}

impl<T> FusedStream for Subscription<T> {
    fn is_terminated(&self) -> bool {
        self.state == SubscriptionState::Cancelled
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("state", &self.state)
            .field("queued", &self.queued())
            .finish()
    }
}

#[cfg(all(test, feature = "local"))]
mod tests {
    use futures::{FutureExt, StreamExt};

    use super::*;
    use crate::dispatch::LocalDispatch;

    fn setup() -> (Arc<LocalDispatch>, DispatchRef) {
        let local = Arc::new(LocalDispatch::new());
        let dispatch: DispatchRef = local.clone();
        (local, dispatch)
    }

    fn publish(d: &LocalDispatch, topic: &str, v: u32) {
        d.dispatch(&Event::new(Topic::new(topic), v));
    }

    #[tokio::test]
    async fn registers_lazily_on_first_poll() {
        let (local, dispatch) = setup();
        let topic = Topic::new("ping");
        let mut sub = Subscription::<u32>::new(dispatch, topic.clone(), BufferPolicy::Unbounded);

        assert_eq!(sub.state(), SubscriptionState::Created);
        assert_eq!(local.listener_count(&topic), 0);

        publish(&local, "ping", 1);
        assert!(sub.next().now_or_never().is_none());
        assert_eq!(sub.state(), SubscriptionState::Listening);
        assert_eq!(local.listener_count(&topic), 1);

        publish(&local, "ping", 2);
        assert_eq!(sub.next().await, Some(2));
    }

    #[tokio::test]
    async fn activate_registers_without_polling() {
        let (local, dispatch) = setup();
        let mut sub = Subscription::<u32>::new(dispatch, Topic::new("ping"), BufferPolicy::Unbounded);

        sub.activate();
        publish(&local, "ping", 7);
        publish(&local, "ping", 8);

        assert_eq!(sub.queued(), 2);
        assert_eq!(sub.next().await, Some(7));
        assert_eq!(sub.next().await, Some(8));
    }

    #[tokio::test]
    async fn cancel_removes_listener_exactly_once() {
        let (local, dispatch) = setup();
        let topic = Topic::new("ping");
        let mut sub = Subscription::<u32>::new(dispatch, topic.clone(), BufferPolicy::Unbounded);
        sub.activate();
        publish(&local, "ping", 1);

        sub.cancel();
        sub.cancel();

        assert_eq!(sub.state(), SubscriptionState::Cancelled);
        assert_eq!(local.listener_count(&topic), 0);
        assert_eq!(sub.queued(), 0);

        publish(&local, "ping", 2);
        assert_eq!(sub.next().await, None);
        assert!(sub.is_terminated());
    }

    #[tokio::test]
    async fn cancel_before_first_poll_never_registers() {
        let (local, dispatch) = setup();
        let topic = Topic::new("ping");
        let mut sub = Subscription::<u32>::new(dispatch, topic.clone(), BufferPolicy::Unbounded);

        sub.cancel();
        assert_eq!(sub.next().await, None);
        assert_eq!(local.listener_count(&topic), 0);
    }

    #[tokio::test]
    async fn token_cancellation_wakes_pending_consumer() {
        let (local, dispatch) = setup();
        let topic = Topic::new("ping");
        let mut sub = Subscription::<u32>::new(dispatch, topic.clone(), BufferPolicy::Unbounded);
        let token = sub.cancel_token();

        let consumer = tokio::spawn(async move {
            let got = sub.next().await;
            (got, sub.state())
        });
        tokio::task::yield_now().await;
        token.cancel();

        let (got, state) = consumer.await.expect("consumer task");
        assert_eq!(got, None);
        assert_eq!(state, SubscriptionState::Cancelled);
        assert_eq!(local.listener_count(&topic), 0);
    }

    #[tokio::test]
    async fn token_cancellation_stops_queueing_without_a_poll() {
        let (local, dispatch) = setup();
        let topic = Topic::new("ping");
        let mut sub = Subscription::<u32>::new(dispatch, topic.clone(), BufferPolicy::Unbounded);
        sub.activate();

        sub.cancel_token().cancel();
        for v in 0..1000 {
            publish(&local, "ping", v);
        }

        assert_eq!(local.listener_count(&topic), 0);
        assert_eq!(sub.queued(), 0);
        assert_eq!(sub.size_hint(), (0, None));

        assert_eq!(sub.next().await, None);
        assert_eq!(sub.state(), SubscriptionState::Cancelled);
        assert_eq!(sub.size_hint(), (0, Some(0)));
    }

    #[tokio::test]
    async fn drop_deregisters() {
        let (local, dispatch) = setup();
        let topic = Topic::new("ping");
        let mut sub = Subscription::<u32>::new(dispatch, topic.clone(), BufferPolicy::Unbounded);
        sub.activate();
        assert_eq!(local.listener_count(&topic), 1);

        drop(sub);
        assert_eq!(local.listener_count(&topic), 0);
    }

    #[tokio::test]
    async fn bounded_buffer_drops_newest() {
        let (local, dispatch) = setup();
        let mut sub =
            Subscription::<u32>::new(dispatch, Topic::new("ping"), BufferPolicy::Bounded { capacity: 2 });
        sub.activate();

        for v in 1..=4 {
            publish(&local, "ping", v);
        }

        assert_eq!(sub.queued(), 2);
        assert_eq!(sub.next().await, Some(1));
        assert_eq!(sub.next().await, Some(2));
        assert!(sub.next().now_or_never().is_none());
    }

    #[tokio::test]
    async fn huge_bounded_capacity_does_not_panic() {
        let (local, dispatch) = setup();
        let mut sub = Subscription::<u32>::new(
            dispatch,
            Topic::new("ping"),
            BufferPolicy::Bounded { capacity: usize::MAX },
        );
        sub.activate();

        publish(&local, "ping", 5);
        assert_eq!(sub.next().await, Some(5));
    }

    #[tokio::test]
    async fn mismatched_payload_type_is_skipped() {
        let (local, dispatch) = setup();
        let mut sub = Subscription::<u32>::new(dispatch, Topic::new("ping"), BufferPolicy::Unbounded);
        sub.activate();

        local.dispatch(&Event::new(Topic::new("ping"), String::from("not a number")));
        publish(&local, "ping", 3);

        assert_eq!(sub.next().await, Some(3));
    }
}
