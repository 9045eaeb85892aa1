//! Keyed response cache with a time-to-live
//!
//! Wraps an async computation with a cache key and a duration. Within the
//! duration the computation runs at most once per key; concurrent callers
//! wait for the running computation and share its result. Errors are not
//! cached.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;
use tracing::debug;

use crate::error::Result;

struct Slot<T> {
    expires_at: Instant,
    cell: Arc<OnceCell<T>>,
}

/// In-memory cache of extraction results
pub struct ResponseCache<T> {
    slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T: Clone> ResponseCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the value cached under `key`, computing it with `f` if the key
    /// is missing or older than `ttl`.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use animekai_core::cache::ResponseCache;
    ///
    /// # async fn example() -> animekai_core::Result<()> {
    /// let cache: ResponseCache<String> = ResponseCache::new();
    /// let value = cache
    ///     .get_or_try_insert_with("home", Duration::from_secs(60), || async {
    ///         Ok("computed".to_string())
    ///     })
    ///     .await?;
    /// assert_eq!(value, "computed");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_or_try_insert_with<F, Fut>(&self, key: &str, ttl: Duration, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let cell = {
            let mut slots = self.slots.lock().await;
            let now = Instant::now();
            let fresh = slots
                .get(key)
                .map_or(false, |slot| slot.expires_at > now);

            if fresh {
                debug!(key, "Cache hit");
            } else {
                slots.retain(|_, slot| slot.expires_at > now);
                slots.insert(
                    key.to_string(),
                    Slot {
                        expires_at: now + ttl,
                        cell: Arc::new(OnceCell::new()),
                    },
                );
            }
            slots
                .get(key)
                .map(|slot| Arc::clone(&slot.cell))
                .unwrap_or_default()
        };

        cell.get_or_try_init(|| {
            debug!(key, "Cache miss, computing");
            f()
        })
        .await
        .cloned()
    }

    /// Drop the entry for `key`
    pub async fn invalidate(&self, key: &str) {
        self.slots.lock().await.remove(key);
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }

    /// Drop entries whose time-to-live has passed
    pub async fn purge_expired(&self) {
        let now = Instant::now();
        self.slots.lock().await.retain(|_, slot| slot.expires_at > now);
    }

    /// Number of entries, including expired ones not yet purged
    ///
    /// Expired entries are also dropped whenever a key is (re)computed.
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.slots.lock().await.is_empty()
    }
}

impl<T: Clone> Default for ResponseCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnimeKaiError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{advance, sleep};

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_computation() {
        let cache: ResponseCache<u32> = ResponseCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let compute = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            sleep(Duration::from_millis(50)).await;
            Ok::<_, AnimeKaiError>(42)
        };

        let (a, b, c) = tokio::join!(
            cache.get_or_try_insert_with("home", TTL, compute),
            cache.get_or_try_insert_with("home", TTL, compute),
            cache.get_or_try_insert_with("home", TTL, compute),
        );

        assert_eq!(a.unwrap(), 42);
        assert_eq!(b.unwrap(), 42);
        assert_eq!(c.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache: ResponseCache<usize> = ResponseCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let compute = || async move { Ok::<_, AnimeKaiError>(calls.fetch_add(1, Ordering::SeqCst) + 1) };

        assert_eq!(cache.get_or_try_insert_with("k", TTL, compute).await.unwrap(), 1);
        advance(Duration::from_secs(30)).await;
        assert_eq!(cache.get_or_try_insert_with("k", TTL, compute).await.unwrap(), 1);
        advance(Duration::from_secs(31)).await;
        assert_eq!(cache.get_or_try_insert_with("k", TTL, compute).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache: ResponseCache<String> = ResponseCache::new();

        let a = cache
            .get_or_try_insert_with("a", TTL, || async { Ok("first".to_string()) })
            .await
            .unwrap();
        let b = cache
            .get_or_try_insert_with("b", TTL, || async { Ok("second".to_string()) })
            .await
            .unwrap();

        assert_eq!(a, "first");
        assert_eq!(b, "second");
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: ResponseCache<u32> = ResponseCache::new();

        let failed = cache
            .get_or_try_insert_with("k", TTL, || async { Err(AnimeKaiError::RateLimited) })
            .await;
        assert!(matches!(failed, Err(AnimeKaiError::RateLimited)));

        let value = cache
            .get_or_try_insert_with("k", TTL, || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_and_purge() {
        let cache: ResponseCache<u32> = ResponseCache::new();
        cache
            .get_or_try_insert_with("a", TTL, || async { Ok(1) })
            .await
            .unwrap();
        cache
            .get_or_try_insert_with("b", Duration::from_secs(1), || async { Ok(2) })
            .await
            .unwrap();

        cache.invalidate("a").await;
        assert_eq!(cache.len().await, 1);

        advance(Duration::from_secs(2)).await;
        cache.purge_expired().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_keys_dropped_on_insert() {
        let cache: ResponseCache<usize> = ResponseCache::new();
        for i in 0..50 {
            cache
                .get_or_try_insert_with(&format!("anime:{}", i), TTL, || async move { Ok(i) })
                .await
                .unwrap();
        }
        assert_eq!(cache.len().await, 50);

        advance(TTL + Duration::from_secs(1)).await;
        cache
            .get_or_try_insert_with("anime:new", TTL, || async { Ok(0) })
            .await
            .unwrap();

        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_keys_survive_insert() {
        let cache: ResponseCache<u32> = ResponseCache::new();
        cache
            .get_or_try_insert_with("short", Duration::from_secs(1), || async { Ok(1) })
            .await
            .unwrap();
        cache
            .get_or_try_insert_with("long", TTL, || async { Ok(2) })
            .await
            .unwrap();

        advance(Duration::from_secs(2)).await;
        cache
            .get_or_try_insert_with("other", TTL, || async { Ok(3) })
            .await
            .unwrap();

        assert_eq!(cache.len().await, 2);
        let long = cache
            .get_or_try_insert_with("long", TTL, || async { Ok(99) })
            .await
            .unwrap();
        assert_eq!(long, 2);
    }
}
