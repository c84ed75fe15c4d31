//! # Background handlers for subscriptions.
//!
//! This module provides the [`Handler`] trait and [`HandlerSet`], which drains
//! subscriptions on dedicated tokio tasks.
//!
//! ## Architecture
//! ```text
//! PubSub::subscribe ──► Subscription ──► HandlerSet::attach
//!                                              │
//!                                              └──► worker ──► Handler::handle(payload)
//!                                                                 │
//!                                                        ┌────────┼─────────┐
//!                                                        ▼        ▼         ▼
//!                                                   LogHandler HandlerFn  Custom
//! ```
//!
//! ## Implementing custom handlers
//! ```no_run
//! use async_trait::async_trait;
//! use topicbus::Handler;
//!
//! struct Counter;
//!
//! #[async_trait]
//! impl Handler<u32> for Counter {
//!     async fn handle(&self, payload: u32) {
//!         let _ = payload; // increment a counter
//!     }
//! }
//! ```

mod handler;
#[cfg(feature = "logging")]
mod log;
mod set;

pub use handler::{Handler, HandlerFn};
#[cfg(feature = "logging")]
pub use log::LogHandler;
pub use set::HandlerSet;
