//! Channel contracts and topic resolution.
//!
//! ## Contents
//! - [`Channel`] static key + argument shape of one channel
//! - [`Topic`], [`TopicId`] resolve `key` / `key:id` addressing strings
//! - [`channel!`](crate::channel) declares a channel in one line

mod channel;
mod topic;

pub use channel::Channel;
pub use topic::{Topic, TopicId};
