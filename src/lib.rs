//! TTL Cache - a bounded key/value cache with LRU eviction and TTL expiration
//!
//! The [`cache::TtlCache`] type is usable on its own; the `api`, `models`
//! and `tasks` modules serve a string-keyed instance over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheConfig, CacheEvent, TtlCache};
pub use config::Config;
pub use error::{CacheError, ConfigError};
pub use tasks::spawn_cleanup_task;
