use crate::core::Config;
use crate::dispatch::DispatchRef;
use crate::error::PubSubError;

use super::pubsub::PubSub;

/// Builder for constructing a [`PubSub`] with an optional custom dispatch surface.
pub struct PubSubBuilder {
    cfg: Config,
    dispatch: Option<DispatchRef>,
}

impl PubSubBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            dispatch: None,
        }
    }

    /// Sets the dispatch surface to publish through.
    ///
    /// Use this to share one surface between several engines, or to plug in a
    /// distributed implementation. Without it the in-memory
    /// [`LocalDispatch`](crate::LocalDispatch) is used (feature `local`).
    pub fn with_dispatch(mut self, dispatch: DispatchRef) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Builds and returns the engine.
    ///
    /// # Errors
    /// [`PubSubError::DispatchUnavailable`] if no dispatch surface was supplied
    /// and the `local` feature is disabled.
    pub fn build(self) -> Result<PubSub, PubSubError> {
        let dispatch = match self.dispatch {
            Some(dispatch) => dispatch,
            None => default_dispatch()?,
        };
        Ok(PubSub::new_internal(dispatch, self.cfg))
    }
}

#[cfg(feature = "local")]
fn default_dispatch() -> Result<DispatchRef, PubSubError> {
    Ok(std::sync::Arc::new(crate::dispatch::LocalDispatch::new()))
}

#[cfg(not(feature = "local"))]
fn default_dispatch() -> Result<DispatchRef, PubSubError> {
    tracing::error!("no dispatch surface supplied and `local` feature disabled");
    Err(PubSubError::DispatchUnavailable)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::channels::Topic;
    use crate::dispatch::{Dispatch, Event, ListenerRef, same_listener};

    /// Dispatch surface that records calls and delivers nothing.
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<String>>,
        listeners: Mutex<Vec<(Topic, ListenerRef)>>,
    }

    impl Dispatch for Recording {
        fn add_listener(&self, topic: &Topic, listener: ListenerRef) -> bool {
            self.calls.lock().push(format!("add {topic}"));
            self.listeners.lock().push((topic.clone(), listener));
            true
        }

        fn remove_listener(&self, topic: &Topic, listener: &ListenerRef) -> bool {
            self.calls.lock().push(format!("remove {topic}"));
            let mut ls = self.listeners.lock();
            let before = ls.len();
            ls.retain(|(t, l)| !(t == topic && same_listener(l, listener)));
            ls.len() != before
        }

        fn dispatch(&self, event: &Event) {
            self.calls.lock().push(format!("dispatch {}", event.topic));
        }

        fn listener_count(&self, topic: &Topic) -> usize {
            self.listeners.lock().iter().filter(|(t, _)| t == topic).count()
        }
    }

    crate::channel!(Msg: "msg" [str] => u32);

    #[test]
    fn custom_dispatch_receives_every_call() {
        let recording = Arc::new(Recording::default());
        let bus = PubSubBuilder::new(Config::default())
            .with_dispatch(recording.clone())
            .build()
            .expect("custom dispatch always builds");

        let mut sub = bus.subscribe_to::<Msg>("a");
        sub.activate();
        bus.publish_to::<Msg>("a", 1);
        drop(sub);

        assert_eq!(
            *recording.calls.lock(),
            vec!["add msg:a", "dispatch msg:a", "remove msg:a"]
        );
        assert_eq!(recording.listener_count(&Topic::new("msg:a")), 0);
    }

    #[cfg(feature = "local")]
    #[test]
    fn falls_back_to_local_dispatch() {
        assert!(PubSubBuilder::new(Config::default()).build().is_ok());
    }

    #[cfg(not(feature = "local"))]
    #[test]
    fn missing_dispatch_is_a_setup_error() {
        let err = PubSubBuilder::new(Config::default()).build().unwrap_err();
        assert_eq!(err, PubSubError::DispatchUnavailable);
    }
}
