//! Error types used by the topicbus engine.
//!
//! Only setup can fail: [`PubSubError`] is returned by
//! [`PubSubBuilder::build`](crate::PubSubBuilder::build) when no dispatch
//! surface is available. Publishing and subscribing never fail; publishing
//! to a topic nobody listens on is a silent no-op.
//!
//! Like the rest of the crate's error types, it provides helper methods
//! (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

/// # Errors produced while constructing a [`PubSub`](crate::PubSub).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PubSubError {
    /// No dispatch surface was supplied and the built-in in-memory one is compiled out.
    #[error(
        "topicbus needs a dispatch surface: none was supplied and the `local` feature \
         (in-memory `LocalDispatch`) is disabled. Either enable the `local` feature or \
         pass your own implementation with `PubSubBuilder::with_dispatch(Arc::new(..))`"
    )]
    DispatchUnavailable,
}

impl PubSubError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use topicbus::PubSubError;
    ///
    /// assert_eq!(PubSubError::DispatchUnavailable.as_label(), "dispatch_unavailable");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PubSubError::DispatchUnavailable => "dispatch_unavailable",
        }
    }

    /// Returns a short human-readable message.
    pub fn as_message(&self) -> String {
        match self {
            PubSubError::DispatchUnavailable => {
                "no dispatch surface supplied and `local` feature disabled".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_explains_how_to_fix() {
        let msg = PubSubError::DispatchUnavailable.to_string();
        assert!(msg.contains("`local` feature"));
        assert!(msg.contains("with_dispatch"));
    }
}
