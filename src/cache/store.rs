//! Cache Store Module
//!
//! String-keyed cache served over HTTP: wraps a [`TtlCache`], validates
//! request sizes and turns cache events into statistics and logs.

use tracing::debug;

use crate::cache::{
    CacheConfig, CacheEvent, CacheStats, TtlCache, MAX_KEY_LENGTH, MAX_VALUE_SIZE,
};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore {
    /// Underlying TTL/LRU cache
    cache: TtlCache<String, String>,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore from validated cache settings.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            cache: TtlCache::new(config),
            stats: CacheStats::new(),
        }
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// If the key already exists, the value is overwritten and TTL is reset.
    /// If the cache is at capacity, the least recently used entry is evicted.
    pub fn set(&mut self, key: String, value: String) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
        }

        // Validate key length
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        // Validate value size
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        self.cache.set(key, value);
        self.absorb_events();
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key, refreshing its TTL.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Result<String> {
        let present = self.cache.has(key);

        match self.cache.get(key).cloned() {
            Some(value) => {
                self.stats.record_hit();
                Ok(value)
            }
            None => {
                self.stats.record_miss();
                self.absorb_events();
                if present {
                    Err(CacheError::Expired(key.to_string()))
                } else {
                    Err(CacheError::NotFound(key.to_string()))
                }
            }
        }
    }

    // == Has ==
    /// Checks whether a key is present, including stale entries.
    pub fn has(&self, key: &str) -> bool {
        self.cache.has(key)
    }

    // == Delete ==
    /// Removes an entry by key and returns its value.
    pub fn delete(&mut self, key: &str) -> Result<String> {
        let value = self
            .cache
            .delete(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        self.absorb_events();
        Ok(value)
    }

    // == Keys ==
    /// Fresh keys, most recently used first.
    pub fn keys(&self) -> Vec<String> {
        self.cache.keys().cloned().collect()
    }

    // == Entries ==
    /// Fresh key-value pairs, most recently used first.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.cache
            .entries()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    // == Cleanup Expired ==
    /// Removes the stale entries at the least recently used end.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let removed = self.cache.cleanup(true);
        self.absorb_events();
        removed
    }

    // == Resize ==
    /// Changes the capacity, returning how many entries were evicted.
    pub fn resize(&mut self, capacity: usize) -> Result<usize> {
        let evicted = self.cache.resize(capacity, true)?;
        self.absorb_events();
        Ok(evicted)
    }

    // == Clear ==
    /// Drops every entry without counting evictions.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.absorb_events();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.cache.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Entry time-to-live in milliseconds.
    pub fn ttl(&self) -> u64 {
        self.cache.ttl()
    }

    // == Event Handling ==
    fn absorb_events(&mut self) {
        for event in self.cache.drain_events() {
            self.stats.record_event(&event);
            match &event {
                CacheEvent::Evict { key, reason, .. } => {
                    debug!(key = %key, reason = ?reason, "entry evicted");
                }
                CacheEvent::Full => debug!("cache reached capacity"),
                CacheEvent::Empty => debug!("cache is empty"),
            }
        }
        self.stats.set_total_entries(self.cache.len());
    }
}
