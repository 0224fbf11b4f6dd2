//! Memoizing response cache for endpoint operations.
//!
//! [`ResponseCache`] maps a [`Fingerprint`] to the JSON result an engine
//! produced for it. Each model endpoint owns one cache per operation kind;
//! caches are never shared between endpoints.
//!
//! # Semantics
//!
//! - [`ResponseCache::get_or_compute`] runs the compute future only when the
//!   fingerprint is absent, and reports whether the call was a hit.
//! - Concurrent callers for the same absent fingerprint are coalesced: the
//!   compute future runs once and every caller receives its result.
//! - Failed computations are neither stored nor counted.
//! - Eviction is least-recently-used once `max_entries` is exceeded. Every
//!   insert applies pending maintenance before returning, so the entry
//!   count never stays above capacity and an evicted key is a miss on the
//!   very next call.
//! - `max_entries = 0` allocates no storage: every call is a miss.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache;
use moka::policy::EvictionPolicy;
use serde::Serialize;
use serde_json::Value;

use super::Fingerprint;

/// Default maximum number of entries per cache.
pub const DEFAULT_MAX_ENTRIES: u64 = 1024;

/// Configuration for a response cache.
///
/// ```rust
/// # use exhibit::cache::CacheConfig;
/// let config = CacheConfig::new().max_entries(256);
/// assert_eq!(config.max_entries, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 1,024. Zero disables storage.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that never stores anything.
    pub fn disabled() -> Self {
        Self { max_entries: 0 }
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
    pub capacity: u64,
}

/// Bounded LRU cache of JSON results keyed on request fingerprints.
pub struct ResponseCache {
    /// `None` when the configured capacity is zero.
    cache: Option<Cache<Fingerprint, Value>>,
    capacity: u64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    /// Create a new response cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = (config.max_entries > 0).then(|| {
            Cache::builder()
                .max_capacity(config.max_entries)
                .eviction_policy(EvictionPolicy::lru())
                .build()
        });
        Self {
            cache,
            capacity: config.max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached result for `fingerprint`, computing it on a miss.
    ///
    /// The boolean is `true` when the result came from storage. `compute` is
    /// only called on a miss, and at most once per fingerprint across
    /// concurrent callers. Errors propagate unchanged and leave both the
    /// cache and its counters untouched.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        fingerprint: Fingerprint,
        compute: F,
    ) -> Result<(Value, bool), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: Clone + Send + Sync + 'static,
    {
        let Some(cache) = &self.cache else {
            let value = compute().await?;
            self.misses.fetch_add(1, Ordering::Relaxed);
            return Ok((value, false));
        };

        let entry = cache
            .entry(fingerprint)
            .or_try_insert_with(async move { compute().await })
            .await
            .map_err(|err: Arc<E>| (*err).clone())?;

        let hit = !entry.is_fresh();
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            // Apply queued reads, then this insert, so capacity holds and
            // the least recently used entry is the one evicted.
            cache.run_pending_tasks().await;
        }
        Ok((entry.into_value(), hit))
    }

    /// Whether a result is currently stored for `fingerprint`.
    ///
    /// Does not count as an access for eviction purposes.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|cache| cache.contains_key(fingerprint))
    }

    /// Apply deferred maintenance (pending evictions and recency updates).
    pub async fn run_pending_tasks(&self) {
        if let Some(cache) = &self.cache {
            cache.run_pending_tasks().await;
        }
    }

    /// Remove every entry and reset the counters.
    pub async fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
            cache.run_pending_tasks().await;
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Configured capacity.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Number of stored entries.
    pub fn len(&self) -> u64 {
        self.cache.as_ref().map_or(0, |cache| cache.entry_count())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits(),
            misses: self.misses(),
            entries: self.len(),
            capacity: self.capacity,
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationKind;
    use serde_json::json;

    fn fp(payload: &str) -> Fingerprint {
        Fingerprint::new(OperationKind::Predict, None, payload.as_bytes())
    }

    #[test]
    fn cache_config_defaults() {
        assert_eq!(CacheConfig::default().max_entries, 1024);
        assert_eq!(CacheConfig::disabled().max_entries, 0);
    }

    #[tokio::test]
    async fn miss_then_hit() {
        let cache = ResponseCache::default();

        let (v, hit) = cache
            .get_or_compute(fp("a"), || async { Ok::<_, String>(json!({"n": 1})) })
            .await
            .unwrap();
        assert_eq!(v, json!({"n": 1}));
        assert!(!hit);

        let (v, hit) = cache
            .get_or_compute(fp("a"), || async { Ok::<_, String>(json!({"n": 2})) })
            .await
            .unwrap();
        assert_eq!(v, json!({"n": 1}));
        assert!(hit);

        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[tokio::test]
    async fn clear_resets_entries_and_counters() {
        let cache = ResponseCache::default();
        cache
            .get_or_compute(fp("a"), || async { Ok::<_, String>(json!(1)) })
            .await
            .unwrap();
        cache
            .get_or_compute(fp("a"), || async { Ok::<_, String>(json!(1)) })
            .await
            .unwrap();

        cache.clear().await;

        assert!(!cache.contains(&fp("a")));
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.stats().misses, 0);
    }

    #[tokio::test]
    async fn disabled_cache_reports_zero_capacity() {
        let cache = ResponseCache::new(&CacheConfig::disabled());
        assert_eq!(cache.capacity(), 0);
        assert!(cache.is_empty());
    }
}
