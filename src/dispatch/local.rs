//! # In-memory dispatch surface.
//!
//! [`LocalDispatch`] keeps a `topic → [listener]` map behind a
//! `parking_lot::RwLock`.
//!
//! ## Architecture
//! ```text
//! dispatch(event)
//!     │
//!     ├─► read lock ─► snapshot listeners of event.topic ─► unlock
//!     │
//!     ├─► listener 1.on_event(event)   (still registered? else skip)
//!     ├─► listener 2.on_event(event)
//!     └─► listener N.on_event(event)
//! ```
//!
//! ## Rules
//! - The lock is never held while a listener runs, so listeners may publish,
//!   subscribe or cancel reentrantly.
//! - Listeners added during a dispatch do not see the in-flight event.
//! - Listeners removed during a dispatch and not yet invoked are skipped.
//! - A topic whose last listener is removed is pruned from the map.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use super::event::Event;
use super::listener::{ListenerRef, same_listener};
use super::surface::Dispatch;
use crate::channels::Topic;

/// One registration; `live` is cleared on removal so in-flight snapshots skip it.
#[derive(Clone)]
struct Entry {
    listener: ListenerRef,
    live: Arc<AtomicBool>,
}

impl Entry {
    fn new(listener: ListenerRef) -> Self {
        Self {
            listener,
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// Default in-memory [`Dispatch`] implementation.
#[derive(Default)]
pub struct LocalDispatch {
    topics: RwLock<HashMap<Topic, Vec<Entry>>>,
}

impl LocalDispatch {
    /// Creates an empty dispatch surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of topics with at least one listener.
    pub fn topic_count(&self) -> usize {
        self.topics.read().len()
    }
}

impl Dispatch for LocalDispatch {
    fn add_listener(&self, topic: &Topic, listener: ListenerRef) -> bool {
        let mut topics = self.topics.write();
        let entries = topics.entry(topic.clone()).or_default();
        if entries.iter().any(|e| same_listener(&e.listener, &listener)) {
            return false;
        }
        entries.push(Entry::new(listener));
        true
    }

    fn remove_listener(&self, topic: &Topic, listener: &ListenerRef) -> bool {
        let mut topics = self.topics.write();
        let Some(entries) = topics.get_mut(topic) else {
            return false;
        };
        let Some(pos) = entries.iter().position(|e| same_listener(&e.listener, listener)) else {
            return false;
        };
        let entry = entries.remove(pos);
        entry.live.store(false, Ordering::Release);
        if entries.is_empty() {
            topics.remove(topic);
        }
        true
    }

    fn dispatch(&self, event: &Event) {
        let snapshot: Vec<Entry> = match self.topics.read().get(&event.topic) {
            Some(entries) => entries.clone(),
            None => return,
        };

        tracing::trace!(
            topic = %event.topic,
            seq = event.seq,
            listeners = snapshot.len(),
            "dispatching event"
        );

        for entry in snapshot.iter().filter(|e| e.is_live()) {
            entry.listener.on_event(event);
        }
    }

    fn listener_count(&self, topic: &Topic) -> usize {
        self.topics.read().get(topic).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for LocalDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalDispatch")
            .field("topics", &self.topic_count())
            .finish()
    }
}
