//! In-memory response store with lazy, read-time expiry.

use super::clock::{Clock, SystemClock};
use super::key::{CacheKey, KeyMode};
use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

/// How long a stored response is served without touching the network.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// A stored successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub stored_at: Instant,
    pub data: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    /// Responses with a non-success status that were returned but not stored.
    pub skipped_failures: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    skipped_failures: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            skipped_failures: self.skipped_failures.load(Ordering::Relaxed),
        }
    }
}

/// Keyed store of successful responses.
///
/// Keys carry no endpoint, so a cache serves exactly one endpoint: the first
/// one bound through [`ResponseCache::bind_endpoint`].
///
/// Entries are never evicted. A stale entry stays in place, is ignored by
/// [`ResponseCache::get_fresh`], and is overwritten by the next successful
/// fetch for the same key.
#[derive(Debug)]
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    key_mode: KeyMode,
    endpoint: OnceLock<String>,
    stats: AtomicStats,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock: Arc::new(SystemClock),
            ttl: DEFAULT_TTL,
            key_mode: KeyMode::default(),
            endpoint: OnceLock::new(),
            stats: AtomicStats::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_key_mode(mut self, mode: KeyMode) -> Self {
        self.key_mode = mode;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn key_mode(&self) -> KeyMode {
        self.key_mode
    }

    /// Endpoint this cache serves, once bound.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.get().map(String::as_str)
    }

    /// Bind the cache to `endpoint` on first use; any other endpoint is rejected.
    pub fn bind_endpoint(&self, endpoint: &str) -> Result<()> {
        let bound = self.endpoint.get_or_init(|| endpoint.to_string());
        if bound == endpoint {
            Ok(())
        } else {
            Err(Error::configuration_with_context(
                "response cache already serves another endpoint",
                ErrorContext::new()
                    .with_field_path("endpoint")
                    .with_details(format!("bound to '{}', got '{}'", bound, endpoint))
                    .with_source("response_cache"),
            ))
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn key_for(&self, func: &str, args: &Value) -> Result<CacheKey> {
        CacheKey::derive(func, args, self.key_mode)
    }

    /// The stored data for `key` if it was stored less than `ttl` before `now`.
    pub fn get_fresh(&self, key: &CacheKey, now: Instant) -> Result<Option<Value>> {
        let entries = self.read()?;
        let fresh = entries
            .get(key)
            .filter(|e| now.saturating_duration_since(e.stored_at) < self.ttl)
            .map(|e| e.data.clone());
        drop(entries);

        if fresh.is_some() {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(fresh)
    }

    /// Store `data` under `key`, replacing whatever was there.
    pub fn store(&self, key: CacheKey, data: Value, stored_at: Instant) -> Result<()> {
        self.write()?.insert(key, CacheEntry { stored_at, data });
        self.stats.stores.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub(crate) fn record_skipped_failure(&self) {
        self.stats.skipped_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// The raw entry for `key`, fresh or stale.
    pub fn entry(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        Ok(self.read()?.get(key).cloned())
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<CacheKey, CacheEntry>>> {
        self.entries.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<CacheKey, CacheEntry>>> {
        self.entries.write().map_err(|_| poisoned())
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> Error {
    Error::runtime_with_context(
        "response cache lock poisoned",
        ErrorContext::new().with_source("response_cache"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use serde_json::json;

    fn cache_with_clock() -> (ResponseCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ResponseCache::new().with_clock(clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_fresh_within_window() {
        let (cache, clock) = cache_with_clock();
        let key = CacheKey::from("listPopularEntries:{}");
        cache.store(key.clone(), json!({"items": []}), cache.now()).unwrap();

        clock.advance(Duration::from_millis(59_999));
        assert_eq!(
            cache.get_fresh(&key, cache.now()).unwrap(),
            Some(json!({"items": []}))
        );
    }

    #[test]
    fn test_stale_at_exactly_ttl() {
        let (cache, clock) = cache_with_clock();
        let key = CacheKey::from("k");
        cache.store(key.clone(), json!(1), cache.now()).unwrap();

        clock.advance(Duration::from_millis(60_000));
        assert_eq!(cache.get_fresh(&key, cache.now()).unwrap(), None);
        // stale entries are kept until overwritten
        assert_eq!(cache.len().unwrap(), 1);
        assert!(cache.entry(&key).unwrap().is_some());
    }

    #[test]
    fn test_store_overwrites() {
        let (cache, clock) = cache_with_clock();
        let key = CacheKey::from("k");
        let t0 = cache.now();
        cache.store(key.clone(), json!(1), t0).unwrap();
        clock.advance(Duration::from_secs(61));
        let t1 = cache.now();
        cache.store(key.clone(), json!(2), t1).unwrap();

        let entry = cache.entry(&key).unwrap().unwrap();
        assert_eq!(entry.data, json!(2));
        assert_eq!(entry.stored_at, t1);
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_custom_ttl() {
        let (cache, clock) = cache_with_clock();
        let cache = cache.with_ttl(Duration::from_secs(5));
        let key = CacheKey::from("k");
        cache.store(key.clone(), json!(true), cache.now()).unwrap();
        clock.advance(Duration::from_secs(5));
        assert!(cache.get_fresh(&key, cache.now()).unwrap().is_none());
    }

    #[test]
    fn test_stats() {
        let (cache, _clock) = cache_with_clock();
        let key = CacheKey::from("k");
        assert!(cache.get_fresh(&key, cache.now()).unwrap().is_none());
        cache.store(key.clone(), json!(1), cache.now()).unwrap();
        assert!(cache.get_fresh(&key, cache.now()).unwrap().is_some());
        cache.record_skipped_failure();

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.stores, 1);
        assert_eq!(stats.skipped_failures, 1);
        assert!((stats.hit_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_endpoint_binding() {
        let (cache, _clock) = cache_with_clock();
        assert_eq!(cache.endpoint(), None);
        cache.bind_endpoint("http://a/rpc").unwrap();
        cache.bind_endpoint("http://a/rpc").unwrap();
        let err = cache.bind_endpoint("http://b/rpc").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_eq!(cache.endpoint(), Some("http://a/rpc"));
    }

    #[test]
    fn test_clear() {
        let (cache, _clock) = cache_with_clock();
        cache.store(CacheKey::from("a"), json!(1), cache.now()).unwrap();
        cache.store(CacheKey::from("b"), json!(2), cache.now()).unwrap();
        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
    }
}
