//! Clock Module
//!
//! Time sources consumed by the cache. Every staleness decision is made
//! against the clock injected at construction.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::error::ConfigError;

// == Clock Trait ==
/// A source of timestamps, in the same unit as the cache TTL.
///
/// Implementations must be monotonically non-decreasing. This is not
/// checked, but expiry ordering relies on it.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current timestamp.
    fn now(&self) -> u64;
}

// == System Clock ==
/// Wall-clock time in Unix milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        current_timestamp_ms()
    }
}

// == Monotonic Clock ==
/// Milliseconds elapsed since the clock was created.
///
/// Unaffected by wall-clock adjustments.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep one handle
/// while the cache owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a manual clock starting at `start`.
    pub fn new(start: u64) -> Self {
        Self {
            time: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Moves the clock forward by `by` units.
    pub fn advance(&self, by: u64) {
        self.time.fetch_add(by, Ordering::SeqCst);
    }

    /// Sets the clock to an absolute timestamp.
    pub fn set(&self, time: u64) {
        self.time.store(time, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.time.load(Ordering::SeqCst)
    }
}

// == Clock Source ==
/// Named clock selectable from configuration text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockSource {
    #[default]
    System,
    Monotonic,
}

impl ClockSource {
    /// Builds the clock this source names.
    pub fn into_clock(self) -> Arc<dyn Clock> {
        match self {
            ClockSource::System => Arc::new(SystemClock),
            ClockSource::Monotonic => Arc::new(MonotonicClock::new()),
        }
    }
}

impl FromStr for ClockSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" | "wall" => Ok(ClockSource::System),
            "monotonic" => Ok(ClockSource::Monotonic),
            _ => Err(ConfigError::InvalidClock(s.to_string())),
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A system clock set before the epoch reads as 0.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
