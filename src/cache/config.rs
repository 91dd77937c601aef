//! Cache Configuration Module
//!
//! Resolves TTL, capacity and clock into a validated [`CacheConfig`] before
//! any cache is built.

use std::fmt;
use std::sync::Arc;

use crate::cache::clock::{Clock, ClockSource, SystemClock};
use crate::error::ConfigError;

// == Defaults ==
/// Default entry TTL, in clock units (milliseconds for the provided clocks)
pub const DEFAULT_TTL: u64 = 1000;

/// Capacity value meaning "no limit"
pub const UNBOUNDED: usize = usize::MAX;

/// TTL value meaning "never expires"
pub const NEVER_EXPIRES: u64 = u64::MAX;

// == Cache Config ==
/// Fully resolved cache settings.
///
/// Only obtainable through [`CacheConfig::default`] or a successful
/// [`CacheConfigBuilder::build`], so every instance is valid.
#[derive(Clone)]
pub struct CacheConfig {
    ttl: u64,
    capacity: usize,
    clock: Arc<dyn Clock>,
    notifications: bool,
}

impl CacheConfig {
    /// Starts a builder with every field at its default.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Entry time-to-live.
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Injected time source.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Whether the cache queues lifecycle events.
    pub fn notifications(&self) -> bool {
        self.notifications
    }

    pub(crate) fn without_notifications(mut self) -> Self {
        self.notifications = false;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            capacity: UNBOUNDED,
            clock: Arc::new(SystemClock),
            notifications: true,
        }
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("ttl", &DisplayTtl(self.ttl))
            .field("capacity", &DisplayCapacity(self.capacity))
            .field("clock", &self.clock)
            .field("notifications", &self.notifications)
            .finish()
    }
}

// == Builder ==
/// Collects raw settings and validates them on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    ttl: Option<i64>,
    ttl_resolved: Option<u64>,
    capacity: Option<usize>,
    clock: Option<Arc<dyn Clock>>,
    notifications: Option<bool>,
}

impl CacheConfigBuilder {
    /// Sets the TTL. Negative values are rejected by `build`.
    pub fn ttl(mut self, ttl: i64) -> Self {
        self.ttl = Some(ttl);
        self.ttl_resolved = None;
        self
    }

    /// Entries never expire.
    pub fn no_expiration(mut self) -> Self {
        self.ttl = None;
        self.ttl_resolved = Some(NEVER_EXPIRES);
        self
    }

    /// Sets the maximum entry count. Zero is rejected by `build`.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Removes the entry limit.
    pub fn unbounded(mut self) -> Self {
        self.capacity = Some(UNBOUNDED);
        self
    }

    /// Injects a time source.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Injects a shared time source.
    pub fn shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Uses the named clock.
    pub fn clock_source(self, source: ClockSource) -> Self {
        self.shared_clock(source.into_clock())
    }

    /// Enables or disables the event queue.
    pub fn notifications(mut self, enabled: bool) -> Self {
        self.notifications = Some(enabled);
        self
    }

    /// Validates the collected settings.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidTtl`] if the TTL is negative
    /// - [`ConfigError::InvalidCapacity`] if the capacity is 0
    pub fn build(self) -> Result<CacheConfig, ConfigError> {
        let ttl = match (self.ttl_resolved, self.ttl) {
            (Some(resolved), _) => resolved,
            (None, Some(raw)) => {
                u64::try_from(raw).map_err(|_| ConfigError::InvalidTtl(raw.to_string()))?
            }
            (None, None) => DEFAULT_TTL,
        };

        let capacity = self.capacity.unwrap_or(UNBOUNDED);
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity(capacity.to_string()));
        }

        Ok(CacheConfig {
            ttl,
            capacity,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            notifications: self.notifications.unwrap_or(true),
        })
    }
}

// == Text Parsing ==
/// Parses a TTL from configuration text.
///
/// Accepts a non-negative integer, or `inf`/`infinity`/`never` for entries
/// that never expire.
pub fn parse_ttl(raw: &str) -> Result<u64, ConfigError> {
    let value = raw.trim();
    match value.to_ascii_lowercase().as_str() {
        "inf" | "infinity" | "never" => Ok(NEVER_EXPIRES),
        _ => value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTtl(raw.to_string())),
    }
}

/// Parses a capacity from configuration text.
///
/// Accepts an integer of at least 1, or `unbounded`/`inf`/`infinity`.
pub fn parse_capacity(raw: &str) -> Result<usize, ConfigError> {
    let value = raw.trim();
    match value.to_ascii_lowercase().as_str() {
        "unbounded" | "inf" | "infinity" => Ok(UNBOUNDED),
        _ => match value.parse::<usize>() {
            Ok(capacity) if capacity >= 1 => Ok(capacity),
            _ => Err(ConfigError::InvalidCapacity(raw.to_string())),
        },
    }
}

struct DisplayTtl(u64);

impl fmt::Debug for DisplayTtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == NEVER_EXPIRES {
            f.write_str("never")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

struct DisplayCapacity(usize);

impl fmt::Debug for DisplayCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == UNBOUNDED {
            f.write_str("unbounded")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl(), 1000);
        assert_eq!(config.capacity(), UNBOUNDED);
        assert!(config.notifications());
    }

    #[test]
    fn test_builder_accepts_valid_ttls() {
        for ttl in [0, 1, 10, i64::MAX] {
            let config = CacheConfig::builder().ttl(ttl).build().unwrap();
            assert_eq!(config.ttl(), ttl as u64);
        }
        let config = CacheConfig::builder().no_expiration().build().unwrap();
        assert_eq!(config.ttl(), NEVER_EXPIRES);
    }

    #[test]
    fn test_builder_rejects_negative_ttl() {
        for ttl in [-1, -10, i64::MIN] {
            let result = CacheConfig::builder().ttl(ttl).build();
            assert_eq!(result.unwrap_err(), ConfigError::InvalidTtl(ttl.to_string()));
        }
    }

    #[test]
    fn test_builder_capacity() {
        assert_eq!(CacheConfig::builder().capacity(1).build().unwrap().capacity(), 1);
        assert_eq!(CacheConfig::builder().capacity(5).build().unwrap().capacity(), 5);
        assert_eq!(
            CacheConfig::builder().unbounded().build().unwrap().capacity(),
            UNBOUNDED
        );
        assert_eq!(
            CacheConfig::builder().capacity(0).build().unwrap_err(),
            ConfigError::InvalidCapacity("0".to_string())
        );
    }

    #[test]
    fn test_builder_injects_clock() {
        let clock = ManualClock::new(777);
        let config = CacheConfig::builder().clock(clock.clone()).build().unwrap();
        assert_eq!(config.clock().now(), 777);

        clock.advance(3);
        assert_eq!(config.clock().now(), 780);
    }

    #[test]
    fn test_last_ttl_setting_wins() {
        let config = CacheConfig::builder().no_expiration().ttl(50).build().unwrap();
        assert_eq!(config.ttl(), 50);

        let config = CacheConfig::builder().ttl(-5).no_expiration().build().unwrap();
        assert_eq!(config.ttl(), NEVER_EXPIRES);
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl("0"), Ok(0));
        assert_eq!(parse_ttl(" 250 "), Ok(250));
        assert_eq!(parse_ttl("Infinity"), Ok(NEVER_EXPIRES));

        for bad in ["", "NaN", "-1", "-Infinity", "1.5", "[0]", "abc"] {
            assert_eq!(parse_ttl(bad), Err(ConfigError::InvalidTtl(bad.to_string())));
        }
    }

    #[test]
    fn test_parse_capacity() {
        assert_eq!(parse_capacity("1"), Ok(1));
        assert_eq!(parse_capacity("10"), Ok(10));
        assert_eq!(parse_capacity("unbounded"), Ok(UNBOUNDED));

        for bad in ["", "0", "-1", "NaN", "-Infinity", "ten"] {
            assert_eq!(
                parse_capacity(bad),
                Err(ConfigError::InvalidCapacity(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_debug_output() {
        let config = CacheConfig::builder().no_expiration().build().unwrap();
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("ttl: never"));
        assert!(rendered.contains("capacity: unbounded"));
    }
}
