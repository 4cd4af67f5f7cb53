// # TTL Cache
//
// Time-bounded memoization with explicit keys.
//
// ## Behavior
//
// - A fresh entry is returned without calling the fetch function
// - A missing or expired entry triggers exactly one fetch, whose value
//   replaces the entry
// - Failed fetches are not stored
// - Storing a fetched value also drops every expired entry, so keys that are
//   never asked for again (finished sessions) do not pile up
// - No background refresh and no invalidation hooks
//
// The lock is never held across a fetch. Two concurrent misses on the same
// key may both fetch; the later write wins, which is harmless for
// read/replace data.
//
// Time is read from `tokio::time::Instant`, so paused-clock tests can drive
// expiry with `tokio::time::advance`.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Memoization table with a per-call time-to-live
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value if it is present and not expired
    pub async fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let guard = self.entries.read().await;
        guard
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone())
    }

    /// Return the cached value for `key`, or fetch, store and return a new one
    ///
    /// # Parameters
    ///
    /// - `key`: Cache key; everything that distinguishes results must be in it
    /// - `ttl`: Lifetime of a freshly fetched value
    /// - `fetch`: Called only on a miss or after expiry
    ///
    /// # Returns
    ///
    /// - `Ok(V)`: The cached or freshly fetched value
    /// - `Err(Error)`: The fetch failed; nothing was stored
    pub async fn get_or_fetch<F, Fut>(&self, key: K, ttl: Duration, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(&key).await {
            debug!(?key, "cache hit");
            return Ok(value);
        }

        debug!(?key, ttl_secs = ttl.as_secs(), "cache miss, fetching");
        let value = fetch().await?;

        let now = Instant::now();
        let mut guard = self.entries.write().await;
        let purged = Self::retain_fresh(&mut guard, now);
        if purged > 0 {
            debug!(purged, "dropped expired cache entries");
        }
        guard.insert(
            key,
            CacheEntry {
                value: value.clone(),
                expires_at: now + ttl,
            },
        );

        Ok(value)
    }

    /// Drop expired entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.entries.write().await;
        Self::retain_fresh(&mut guard, Instant::now())
    }

    fn retain_fresh(entries: &mut HashMap<K, CacheEntry<V>>, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        before - entries.len()
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
