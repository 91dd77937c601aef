//! Cache Event Module
//!
//! Lifecycle notifications raised by cache operations.

use serde::Serialize;

// == Evict Reason ==
/// Why an entry was evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictReason {
    /// Capacity pressure from an insert or a resize
    Capacity,
    /// Stale entry reaped by `get` or `cleanup`
    Expired,
}

// == Event Kind ==
/// Notification channel of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Evict,
    Full,
    Empty,
}

// == Cache Event ==
/// A lifecycle notification.
///
/// Events are queued only once the cache is consistent again, so handlers
/// may freely call back into the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent<K, V> {
    /// An entry left the cache through eviction (never through `delete` or `clear`)
    Evict { key: K, value: V, reason: EvictReason },
    /// An insert brought the cache to capacity
    Full,
    /// A removal left the cache with no entries
    Empty,
}

impl<K, V> CacheEvent<K, V> {
    /// Returns the channel this event belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            CacheEvent::Evict { .. } => EventKind::Evict,
            CacheEvent::Full => EventKind::Full,
            CacheEvent::Empty => EventKind::Empty,
        }
    }
}
