//! # Topics: the addressing unit of the dispatch surface.
//!
//! A [`Topic`] is derived from a channel key and an optional identifier:
//! - no identifier → `key`
//! - identifier    → `key:identifier`
//!
//! Two subscriptions on the same key with different identifiers live on
//! disjoint topics and never see each other's events.

use std::borrow::Borrow;
use std::fmt;

/// Resolved topic string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(String);

impl Topic {
    /// Topic for an unqualified channel key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Topic for a key qualified by an identifier (`key:id`).
    ///
    /// ```
    /// use topicbus::Topic;
    ///
    /// assert_eq!(Topic::qualified("userUpdated", "u1").as_str(), "userUpdated:u1");
    /// assert_eq!(Topic::qualified("order", 42).as_str(), "order:42");
    /// ```
    pub fn qualified(key: &str, id: impl fmt::Display) -> Self {
        Self(format!("{key}:{id}"))
    }

    /// Returns the topic as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for Topic {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for Topic {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier that qualifies a channel key into a [`Topic`].
///
/// `()` means "no identifier" and resolves to the bare key; every other
/// implementor resolves to `key:id` using its `Display` form.
pub trait TopicId {
    /// Resolves the topic for `key` qualified by `self`.
    fn topic(&self, key: &str) -> Topic;
}

impl TopicId for () {
    fn topic(&self, key: &str) -> Topic {
        Topic::new(key)
    }
}

macro_rules! display_topic_id {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TopicId for $ty {
                fn topic(&self, key: &str) -> Topic {
                    Topic::qualified(key, self)
                }
            }
        )*
    };
}

display_topic_id!(
    str, String, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_id_resolves_to_bare_key() {
        assert_eq!(().topic("ping"), Topic::new("ping"));
    }

    #[test]
    fn ids_qualify_the_key() {
        assert_eq!("u1".topic("userUpdated").as_str(), "userUpdated:u1");
        assert_eq!(String::from("u2").topic("userUpdated").as_str(), "userUpdated:u2");
        assert_eq!(7u64.topic("order").as_str(), "order:7");
        assert_eq!((-3i32).topic("delta").as_str(), "delta:-3");
    }

    #[test]
    fn different_ids_give_disjoint_topics() {
        assert_ne!("a".topic("msg"), "b".topic("msg"));
        assert_ne!("a".topic("msg"), ().topic("msg"));
    }
}
