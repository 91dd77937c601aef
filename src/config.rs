//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::cache::{parse_capacity, parse_ttl, CacheConfig, ClockSource, NEVER_EXPIRES};
use crate::error::ConfigError;

/// Server configuration parameters.
///
/// Cache settings are validated strictly; server settings fall back to
/// their defaults when missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Validated cache settings
    pub cache: CacheConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in milliseconds
    pub cleanup_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Entry TTL in milliseconds up to `i64::MAX`, or `inf`
    ///   (default: 1000)
    /// - `CACHE_CAPACITY` - Maximum cache entries, or `unbounded` (default: unbounded)
    /// - `CACHE_CLOCK` - `system` or `monotonic` (default: system)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL_MS` - Cleanup frequency in milliseconds, at least 1
    ///   (default: 1000)
    ///
    /// # Errors
    /// Returns a [`ConfigError`] naming the first invalid cache setting.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = CacheConfig::builder();

        if let Some(raw) = lookup("CACHE_TTL_MS") {
            builder = match parse_ttl(&raw)? {
                NEVER_EXPIRES => builder.no_expiration(),
                ttl => builder.ttl(
                    i64::try_from(ttl).map_err(|_| ConfigError::InvalidTtl(raw.clone()))?,
                ),
            };
        }
        if let Some(raw) = lookup("CACHE_CAPACITY") {
            builder = builder.capacity(parse_capacity(&raw)?);
        }
        if let Some(raw) = lookup("CACHE_CLOCK") {
            builder = builder.clock_source(raw.parse::<ClockSource>()?);
        }

        Ok(Self {
            cache: builder.build()?,
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval_ms: lookup("CLEANUP_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .filter(|&ms| ms > 0)
                .unwrap_or(1000),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            server_port: 3000,
            cleanup_interval_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{NEVER_EXPIRES, UNBOUNDED};
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache.ttl(), 1000);
        assert_eq!(config.cache.capacity(), UNBOUNDED);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval_ms, 1000);
    }

    #[test]
    fn test_config_lookup_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.cache.ttl(), 1000);
        assert_eq!(config.cache.capacity(), UNBOUNDED);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval_ms, 1000);
    }

    #[test]
    fn test_config_lookup_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_TTL_MS", "250"),
            ("CACHE_CAPACITY", "64"),
            ("CACHE_CLOCK", "monotonic"),
            ("SERVER_PORT", "8080"),
            ("CLEANUP_INTERVAL_MS", "50"),
        ]))
        .unwrap();

        assert_eq!(config.cache.ttl(), 250);
        assert_eq!(config.cache.capacity(), 64);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cleanup_interval_ms, 50);
    }

    #[test]
    fn test_config_infinite_ttl() {
        let config = Config::from_lookup(lookup_from(&[("CACHE_TTL_MS", "infinity")])).unwrap();
        assert_eq!(config.cache.ttl(), NEVER_EXPIRES);
    }

    #[test]
    fn test_config_rejects_bad_cache_settings() {
        let err = Config::from_lookup(lookup_from(&[("CACHE_TTL_MS", "-5")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTtl("-5".to_string()));

        let err = Config::from_lookup(lookup_from(&[("CACHE_CAPACITY", "0")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidCapacity("0".to_string()));

        let err = Config::from_lookup(lookup_from(&[("CACHE_CLOCK", "")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidClock(String::new()));
    }

    #[test]
    fn test_config_rejects_ttl_beyond_i64() {
        let raw = (i64::MAX as u64 + 1).to_string();
        let err = Config::from_lookup(lookup_from(&[("CACHE_TTL_MS", raw.as_str())])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTtl(raw));

        let max = i64::MAX.to_string();
        let config = Config::from_lookup(lookup_from(&[("CACHE_TTL_MS", max.as_str())])).unwrap();
        assert_eq!(config.cache.ttl(), i64::MAX as u64);
    }

    #[test]
    fn test_config_zero_cleanup_interval_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("CLEANUP_INTERVAL_MS", "0")])).unwrap();
        assert_eq!(config.cleanup_interval_ms, 1000);
    }

    #[test]
    fn test_config_lenient_server_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "not-a-port"),
            ("CLEANUP_INTERVAL_MS", "soon"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval_ms, 1000);
    }
}
