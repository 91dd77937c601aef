//! TTL/LRU Cache Module
//!
//! Main cache engine: a key index over an arena-backed recency list, with
//! capacity eviction from the oldest end and TTL expiry checked against an
//! injected clock.
//!
//! Stale entries are reaped lazily when `get` touches them, or eagerly by
//! [`TtlCache::cleanup`], which sweeps the stale run at the oldest end.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::vec::Drain;

use tracing::debug;

use crate::cache::clock::Clock;
use crate::cache::config::CacheConfig;
use crate::cache::entry::expiry_at;
use crate::cache::event::{CacheEvent, EvictReason};
use crate::cache::iter::{Iter, Keys, Values};
use crate::cache::lru::{EntryId, RecencyList};
use crate::error::ConfigError;

// == TTL Cache ==
/// Bounded key/value cache with LRU eviction and TTL expiry.
///
/// Reads and writes both "bump" an entry: it moves to the newest end of the
/// recency list and its expiry restarts from the current time.
///
/// Each mutating operation replaces the event queue with the
/// [`CacheEvent`]s it raised, which callers collect with
/// [`drain_events`](Self::drain_events) before the next mutation. Events are
/// never held across more than one call.
///
/// # Example
/// ```
/// use ttl_cache::cache::{CacheConfig, CacheEvent, ManualClock, TtlCache};
///
/// let clock = ManualClock::new(0);
/// let config = CacheConfig::builder()
///     .ttl(100)
///     .capacity(2)
///     .clock(clock.clone())
///     .build()
///     .unwrap();
/// let mut cache = TtlCache::new(config);
///
/// cache.set("a", 1);
/// cache.set("b", 2);
/// assert_eq!(cache.get("a"), Some(&1));
///
/// clock.advance(150);
/// assert_eq!(cache.get("a"), None);
/// assert!(cache.drain_events().any(|e| matches!(e, CacheEvent::Evict { key: "a", .. })));
/// ```
pub struct TtlCache<K, V> {
    /// Key to arena slot
    index: HashMap<K, EntryId>,
    /// Recency order, oldest to newest
    list: RecencyList<K, V>,
    ttl: u64,
    capacity: usize,
    clock: Arc<dyn Clock>,
    notifications: bool,
    /// Events not yet drained
    events: Vec<CacheEvent<K, V>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty cache from validated settings.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            index: HashMap::new(),
            list: RecencyList::new(),
            ttl: config.ttl(),
            capacity: config.capacity(),
            clock: config.clock(),
            notifications: config.notifications(),
            events: Vec::new(),
        }
    }

    // == Accessors ==
    /// Number of entries, including stale entries not yet reaped.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lifetime granted to an entry on every touch.
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    // == Has ==
    /// Checks whether `key` is present, stale or not.
    ///
    /// Never reaps and never bumps.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Get ==
    /// Returns the value for `key`, bumping it and restarting its TTL.
    ///
    /// A stale entry is evicted instead (raising `Evict`, then `Empty` if
    /// nothing is left) and `None` is returned.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.events.clear();
        let id = *self.index.get(key)?;
        let now = self.clock.now();

        let stale = self.list.get(id).map_or(true, |entry| entry.is_expired(now));
        if stale {
            self.evict(id, EvictReason::Expired, true);
            self.notify_if_empty();
            return None;
        }

        self.list.bump(id);
        let ttl = self.ttl;
        let entry = self.list.get_mut(id)?;
        entry.refresh(now, ttl);
        Some(&entry.value)
    }

    // == Set ==
    /// Inserts or refreshes `key`.
    ///
    /// Refreshing an existing key replaces its value, restarts its TTL and
    /// bumps it; the previous value is returned and nothing is evicted.
    ///
    /// Inserting a new key into a full cache first evicts the oldest entry.
    /// `Full` is raised whenever an insert brings the cache to capacity.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.events.clear();
        let now = self.clock.now();
        let expires_at = expiry_at(now, self.ttl);

        if let Some(&id) = self.index.get(&key) {
            let previous = self.list.get_mut(id).map(|entry| {
                entry.expires_at = expires_at;
                std::mem::replace(&mut entry.value, value)
            });
            self.list.bump(id);
            return previous;
        }

        if self.index.len() >= self.capacity {
            if let Some(oldest) = self.list.oldest() {
                self.evict(oldest, EvictReason::Capacity, true);
            }
        }

        let id = self.list.push_newest(key.clone(), value, expires_at);
        self.index.insert(key, id);

        if self.index.len() == self.capacity {
            self.emit(CacheEvent::Full);
        }
        None
    }

    // == Delete ==
    /// Removes `key` and returns its value.
    ///
    /// Explicit removal is not an eviction: only `Empty` may be raised.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.events.clear();
        let id = self.index.remove(key)?;
        let entry = self.list.remove(id)?;
        self.notify_if_empty();
        Some(entry.value)
    }

    // == Cleanup ==
    /// Evicts the run of stale entries at the oldest end.
    ///
    /// Stops at the first fresh entry: touch order matches expiry order, so
    /// nothing newer can be stale. Raises `Evict` per entry when `emit` is
    /// set, and `Empty` once if the sweep drained the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self, emit: bool) -> usize {
        self.events.clear();
        let now = self.clock.now();
        let mut removed = 0;

        while let Some(id) = self.list.oldest() {
            let stale = self.list.get(id).is_some_and(|entry| entry.is_expired(now));
            if !stale || !self.evict(id, EvictReason::Expired, emit) {
                break;
            }
            removed += 1;
        }

        if removed > 0 {
            debug!(removed, remaining = self.len(), "swept expired entries");
            self.notify_if_empty();
        }
        removed
    }

    // == Resize ==
    /// Changes the capacity, evicting from the oldest end when shrinking
    /// below the current size.
    ///
    /// Returns the number of entries evicted.
    ///
    /// # Errors
    /// [`ConfigError::InvalidCapacity`] if `capacity` is 0; the cache is
    /// left untouched.
    pub fn resize(&mut self, capacity: usize, emit: bool) -> Result<usize, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity(capacity.to_string()));
        }
        self.events.clear();

        let mut removed = 0;
        while self.index.len() > capacity {
            let Some(oldest) = self.list.oldest() else {
                break;
            };
            if !self.evict(oldest, EvictReason::Capacity, emit) {
                break;
            }
            removed += 1;
        }

        debug!(from = self.capacity, to = capacity, removed, "resized cache");
        self.capacity = capacity;

        if removed > 0 {
            self.notify_if_empty();
        }
        Ok(removed)
    }

    // == Clear ==
    /// Drops every entry. Raises no events.
    pub fn clear(&mut self) {
        self.events.clear();
        self.index.clear();
        self.list.clear();
    }

    // == Expires In ==
    /// Remaining lifetime of `key`, 0 if stale. Does not bump.
    pub fn expires_in<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.get(key)?;
        self.list
            .get(*id)
            .map(|entry| entry.ttl_remaining(self.clock.now()))
    }

    // == Iteration ==
    /// Fresh `(key, value)` pairs, newest first.
    ///
    /// Stops at the first stale entry. Iterating neither bumps nor reaps.
    pub fn entries(&self) -> Iter<'_, K, V> {
        Iter::new(&self.list, self.clock.as_ref())
    }

    /// Fresh keys, newest first.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.entries())
    }

    /// Fresh values, newest first.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.entries())
    }

    // == Events ==
    /// Takes the events raised by the latest mutating call, in order.
    pub fn drain_events(&mut self) -> Drain<'_, CacheEvent<K, V>> {
        self.events.drain(..)
    }

    /// Events of the latest mutating call not yet drained.
    pub fn pending_events(&self) -> &[CacheEvent<K, V>] {
        &self.events
    }

    // == Internal Eviction ==
    /// Removes an entry from both the list and the index, then queues
    /// `Evict` if requested.
    fn evict(&mut self, id: EntryId, reason: EvictReason, emit: bool) -> bool {
        let Some(entry) = self.list.remove(id) else {
            return false;
        };
        self.index.remove(&entry.key);

        if emit {
            self.emit(CacheEvent::Evict {
                key: entry.key,
                value: entry.value,
                reason,
            });
        }
        true
    }

    fn notify_if_empty(&mut self) {
        debug_assert_eq!(self.list.is_empty(), self.index.is_empty());
        if self.index.is_empty() {
            self.emit(CacheEvent::Empty);
        }
    }

    fn emit(&mut self, event: CacheEvent<K, V>) {
        if self.notifications {
            self.events.push(event);
        }
    }
}

/// Default settings with notifications off: a cache nobody drains queues
/// nothing.
impl<K, V> Default for TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new(CacheConfig::default().without_notifications())
    }
}

impl<'a, K, V> IntoIterator for &'a TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct OldestFirst<'a, K, V>(&'a RecencyList<K, V>);

        impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OldestFirst<'_, K, V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map()
                    .entries(self.0.iter().map(|entry| (&entry.key, &entry.value)))
                    .finish()
            }
        }

        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .field("entries", &OldestFirst(&self.list))
            .finish()
    }
}

#[cfg(test)]
impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    /// Panics unless the index and the recency list describe the same entries.
    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        assert!(self.index.len() <= self.capacity, "size exceeds capacity");
        assert_eq!(self.index.len(), self.list.len(), "index/list size mismatch");
        assert_eq!(self.list.oldest().is_none(), self.index.is_empty());
        assert_eq!(self.list.newest().is_none(), self.index.is_empty());

        let mut walked = HashSet::new();
        let mut prev = None;
        let mut cursor = self.list.oldest();
        while let Some(id) = cursor {
            let entry = self.list.get(id).expect("linked slot must be occupied");
            assert_eq!(entry.prev, prev, "broken back link");
            assert_eq!(self.index.get(&entry.key), Some(&id), "index points elsewhere");
            assert!(walked.insert(entry.key.clone()), "cycle or duplicate key");
            prev = Some(id);
            cursor = entry.next;
        }
        assert_eq!(self.list.newest(), prev);
        assert_eq!(walked.len(), self.index.len(), "unreachable index entries");
    }

    /// Every key oldest to newest, stale ones included.
    pub(crate) fn keys_oldest_first(&self) -> Vec<K> {
        self.list.iter().map(|entry| entry.key.clone()).collect()
    }
}
