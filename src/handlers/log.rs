//! # LogHandler: payload printer
//!
//! A minimal handler that logs every payload through `tracing` at `INFO`.
//! Use it for tests or demos. The worker span adds the handler name and topic.
//!
//! ## Example output
//! ```text
//! INFO handler{handler="LogHandler" topic=userUpdated:u1}: payload=User { name: "A" }
//! INFO handler{handler="LogHandler" topic=ping}: payload=42
//! ```

use std::fmt::Debug;

use async_trait::async_trait;

use super::handler::Handler;

/// Payload logger handler.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogHandler;

impl LogHandler {
    /// Construct a new [`LogHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<T> Handler<T> for LogHandler
where
    T: Debug + Send + 'static,
{
    async fn handle(&self, payload: T) {
        tracing::info!(?payload);
    }

    fn name(&self) -> &'static str {
        "LogHandler"
    }
}
