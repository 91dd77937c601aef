//! Cache Entry Module
//!
//! Defines the node stored for each cached item: the key/value pair, its
//! expiry timestamp, and its links into the recency list.

use crate::cache::lru::EntryId;

// == Cache Entry ==
/// A single cached item plus its recency-list links.
///
/// `prev` points toward the oldest end, `next` toward the newest end.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Timestamp (clock units) from which the entry is stale
    pub(crate) expires_at: u64,
    pub(crate) prev: Option<EntryId>,
    pub(crate) next: Option<EntryId>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub(crate) fn new(key: K, value: V, expires_at: u64) -> Self {
        Self {
            key,
            value,
            expires_at,
            prev: None,
            next: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now`.
    ///
    /// Boundary condition: an entry is stale once `now` reaches `expires_at`,
    /// so a zero TTL is stale immediately.
    pub(crate) fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    // == Refresh ==
    /// Restarts the entry's lifetime from `now`.
    pub(crate) fn refresh(&mut self, now: u64, ttl: u64) {
        self.expires_at = expiry_at(now, ttl);
    }

    // == Time To Live ==
    /// Returns remaining lifetime at `now`, 0 once stale.
    pub(crate) fn ttl_remaining(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}

// == Utility Functions ==
/// Expiry timestamp for an entry touched at `now`.
///
/// Saturates, so a TTL of `u64::MAX` never expires.
pub(crate) fn expiry_at(now: u64, ttl: u64) -> u64 {
    now.saturating_add(ttl)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = Entry::new("key", 1, 100);

        assert_eq!(entry.value, 1);
        assert!(entry.prev.is_none());
        assert!(entry.next.is_none());
        assert!(!entry.is_expired(99));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = Entry::new("key", 1, 100);

        assert!(entry.is_expired(100), "Entry should be expired at boundary");
        assert!(entry.is_expired(150));
    }

    #[test]
    fn test_zero_ttl_is_immediately_stale() {
        let entry = Entry::new("key", 1, expiry_at(50, 0));
        assert!(entry.is_expired(50));
    }

    #[test]
    fn test_refresh_extends_life() {
        let mut entry = Entry::new("key", 1, expiry_at(0, 100));
        assert!(entry.is_expired(120));

        entry.refresh(90, 100);
        assert!(!entry.is_expired(120));
        assert_eq!(entry.expires_at, 190);
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = Entry::new("key", 1, 100);

        assert_eq!(entry.ttl_remaining(40), 60);
        assert_eq!(entry.ttl_remaining(100), 0);
        assert_eq!(entry.ttl_remaining(500), 0);
    }

    #[test]
    fn test_infinite_ttl_saturates() {
        let entry = Entry::new("key", 1, expiry_at(1_000, u64::MAX));

        assert_eq!(entry.expires_at, u64::MAX);
        assert!(!entry.is_expired(u64::MAX - 1));
    }
}
