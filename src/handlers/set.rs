//! # HandlerSet: background workers draining subscriptions.
//!
//! [`HandlerSet`] pairs a [`Subscription`] with a [`Handler`] and drives it on
//! a dedicated tokio task.
//!
//! ## Architecture
//! ```text
//! publish ──► Dispatch ──► [subscription queue 1] ──► worker 1 ──► handler1.handle()
//!                     │                                   └──────► panic → logged, continue
//!                     ├──► [subscription queue 2] ──► worker 2 ──► handler2.handle()
//!                     └──► [subscription queue N] ──► worker N ──► handlerN.handle()
//! ```
//!
//! ## Rules
//! - **No cross-handler ordering**: handler A may process payload N while B processes N+5.
//! - **Per-handler FIFO**: each handler sees payloads in publish order.
//! - **Isolation**: a slow or panicking handler does not affect others.
//! - **Eager registration**: `attach` activates the subscription, so payloads
//!   published right after it returns are not lost.
//!
//! ## Shutdown
//! `shutdown()` cancels the set's token; each worker exits, drops its
//! subscription (deregistering its listener) and is awaited. A worker also
//! exits on its own when its subscription is cancelled through its token;
//! finished workers are pruned on the next `attach` and not counted by `len`.
//! Dropping the set without `shutdown()` cancels the token too, but does not
//! wait for the workers.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a handler uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::sync::Arc;

use futures::{FutureExt, StreamExt};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::handler::Handler;
use crate::channels::Topic;
use crate::core::Subscription;

/// Per-handler worker metadata.
struct Worker {
    name: &'static str,
    topic: Topic,
    join: JoinHandle<()>,
}

/// Owner of background handler workers.
#[derive(Default)]
pub struct HandlerSet {
    token: CancellationToken,
    workers: Vec<Worker>,
}

impl HandlerSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a worker feeding every payload of `subscription` to `handler`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach<T>(&mut self, mut subscription: Subscription<T>, handler: Arc<dyn Handler<T>>)
    where
        T: Send + 'static,
    {
        subscription.activate();
        self.workers.retain(|w| !w.join.is_finished());

        let name = handler.name();
        let topic = subscription.topic().clone();
        let token = self.token.child_token();
        let span = tracing::debug_span!("handler", handler = name, topic = %topic);

        let join = tokio::spawn(
            async move {
                loop {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => break,
                        next = subscription.next() => match next {
                            Some(payload) => {
                                let fut = handler.handle(payload);
                                if let Err(panic_err) =
                                    std::panic::AssertUnwindSafe(fut).catch_unwind().await
                                {
                                    tracing::error!(
                                        panic = %panic_message(panic_err.as_ref()),
                                        "handler panicked"
                                    );
                                }
                            }
                            None => break,
                        }
                    }
                }
                tracing::debug!("handler stopped");
            }
            .instrument(span),
        );

        self.workers.push(Worker { name, topic, join });
    }

    /// Token cancelled by [`shutdown`](Self::shutdown); cancel it to stop every worker.
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Gracefully shuts down all workers.
    ///
    /// 1. Cancels the set's token (workers stop pulling, drop their subscriptions)
    /// 2. Awaits all worker tasks to finish
    pub async fn shutdown(mut self) {
        self.token.cancel();

        for w in std::mem::take(&mut self.workers) {
            if let Err(err) = w.join.await {
                tracing::error!(handler = w.name, topic = %w.topic, error = %err, "handler worker failed");
            }
        }
    }

    /// True if no attached handler is still running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of attached handlers whose worker is still running.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.iter().filter(|w| !w.join.is_finished()).count()
    }
}

impl Drop for HandlerSet {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
