//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Shortest pause between sweeps, so a zero interval cannot spin on the lock
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// Reads never reap on their own beyond the key they touch, so this task
/// bounds how long stale entries occupy memory. Each run takes the write
/// lock and sweeps the stale entries at the least recently used end.
///
/// # Arguments
/// * `cache` - Arc<RwLock<CacheStore>> shared reference to the cache
/// * `interval` - Time between cleanup runs, at least 1 ms
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(cache: Arc<RwLock<CacheStore>>, interval: Duration) -> JoinHandle<()> {
    let interval = interval.max(MIN_INTERVAL);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, ManualClock};

    fn shared_store(ttl: i64) -> (Arc<RwLock<CacheStore>>, ManualClock) {
        let clock = ManualClock::new(0);
        let config = CacheConfig::builder()
            .ttl(ttl)
            .capacity(100)
            .clock(clock.clone())
            .build()
            .unwrap();
        (Arc::new(RwLock::new(CacheStore::new(config))), clock)
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let (cache, clock) = shared_store(100);

        cache
            .write()
            .await
            .set("expire_soon".to_string(), "value".to_string())
            .unwrap();
        clock.advance(200);

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;

        {
            let cache_guard = cache.read().await;
            assert!(!cache_guard.has("expire_soon"), "Expired entry should have been swept");
            assert_eq!(cache_guard.stats().expirations, 1);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let (cache, _clock) = shared_store(3_600_000);

        cache
            .write()
            .await
            .set("long_lived".to_string(), "value".to_string())
            .unwrap();

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;

        {
            let mut cache_guard = cache.write().await;
            let result = cache_guard.get("long_lived");
            assert!(result.is_ok(), "Valid entry should not be removed");
            assert_eq!(result.unwrap(), "value");
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_zero_interval_still_sweeps() {
        let (cache, clock) = shared_store(100);
        cache
            .write()
            .await
            .set("stale".to_string(), "value".to_string())
            .unwrap();
        clock.advance(200);

        let handle = spawn_cleanup_task(cache.clone(), Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The task yields between sweeps, so the lock is still obtainable
        assert!(!cache.read().await.has("stale"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let (cache, _clock) = shared_store(100);

        let handle = spawn_cleanup_task(cache, Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
