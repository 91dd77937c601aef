//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and
//! expirations, fed from the cache's event queue.

use serde::Serialize;

use crate::cache::event::{CacheEvent, EvictReason};

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted by capacity pressure
    pub evictions: u64,
    /// Number of stale entries reaped
    pub expirations: u64,
    /// Number of times an insert filled the cache
    pub full_events: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Event ==
    /// Counts a drained cache event.
    pub fn record_event<K, V>(&mut self, event: &CacheEvent<K, V>) {
        match event {
            CacheEvent::Evict {
                reason: EvictReason::Capacity,
                ..
            } => self.evictions += 1,
            CacheEvent::Evict {
                reason: EvictReason::Expired,
                ..
            } => self.expirations += 1,
            CacheEvent::Full => self.full_events += 1,
            CacheEvent::Empty => {}
        }
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
