//! Cache Module
//!
//! Provides a bounded in-memory cache with TTL expiration and LRU eviction,
//! plus the string-keyed store served over HTTP.

mod clock;
mod config;
mod entry;
mod event;
mod iter;
mod lru;
mod stats;
mod store;
mod ttl_cache;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ClockSource, ManualClock, MonotonicClock, SystemClock};
pub use config::{
    parse_capacity, parse_ttl, CacheConfig, CacheConfigBuilder, DEFAULT_TTL, NEVER_EXPIRES,
    UNBOUNDED,
};
pub use event::{CacheEvent, EventKind, EvictReason};
pub use iter::{Iter, Keys, Values};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use ttl_cache::TtlCache;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
