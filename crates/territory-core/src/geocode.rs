//! Memoizing wrapper around the external geocoding collaborator.
//!
//! The cache is keyed by normalized address and bounded: once full, the
//! oldest key is evicted. A miss issues exactly one in-flight geocoder
//! call per key; concurrent requests for the same address wait on that
//! call instead of duplicating it. Failed lookups store nothing.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::error::Result;
use crate::models::GeoPoint;
use crate::ports::Geocoder;

/// Default cache capacity (distinct normalized addresses).
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

pub struct GeocodeCache<G> {
    geocoder: G,
    capacity: usize,
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, Arc<OnceCell<GeoPoint>>>,
    // Insertion order for FIFO eviction
    order: VecDeque<String>,
}

impl<G: Geocoder> GeocodeCache<G> {
    pub fn new(geocoder: G) -> Self {
        Self::with_capacity(geocoder, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(geocoder: G, capacity: usize) -> Self {
        Self {
            geocoder,
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Resolve an address, consulting the cache first.
    ///
    /// Geocoder failures propagate to the caller and leave the cache
    /// without an entry for the address, so a later call retries.
    pub async fn lookup(&self, address: &str) -> Result<GeoPoint> {
        let key = normalize_address(address);
        let cell = self.entry(&key).await;

        let result = cell
            .get_or_try_init(|| async {
                tracing::debug!(address = %key, "geocode cache miss");
                self.geocoder.geocode(address).await
            })
            .await
            .copied();

        if result.is_err() {
            self.forget_if_empty(&key).await;
        }
        result
    }

    /// Resolve a batch of addresses. One failing address does not abort
    /// the rest; each input gets its own outcome, in input order.
    pub async fn lookup_batch(&self, addresses: &[String]) -> Vec<Result<GeoPoint>> {
        let mut results = Vec::with_capacity(addresses.len());
        for address in addresses {
            results.push(self.lookup(address).await);
        }
        results
    }

    /// Number of cached keys (including any still in flight).
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn entry(&self, key: &str) -> Arc<OnceCell<GeoPoint>> {
        let mut state = self.state.lock().await;
        if let Some(cell) = state.entries.get(key) {
            return cell.clone();
        }

        while state.order.len() >= self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.entries.remove(&oldest);
                tracing::debug!(address = %oldest, "evicted geocode cache entry");
            }
        }

        let cell = Arc::new(OnceCell::new());
        state.entries.insert(key.to_string(), cell.clone());
        state.order.push_back(key.to_string());
        cell
    }

    async fn forget_if_empty(&self, key: &str) {
        let mut state = self.state.lock().await;
        let still_empty = state.entries.get(key).is_some_and(|c| c.get().is_none());
        if still_empty {
            state.entries.remove(key);
            state.order.retain(|k| k != key);
        }
    }
}

/// Cache key normalization: trim, lowercase, collapse internal whitespace.
pub fn normalize_address(address: &str) -> String {
    address
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TerritoryError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeGeocoder {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeGeocoder {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0), fail: false }
        }

        fn failing() -> Self {
            Self { calls: AtomicUsize::new(0), fail: true }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, address: &str) -> Result<GeoPoint> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Simulate network latency so concurrent lookups overlap
            tokio::time::sleep(Duration::from_millis(10)).await;
            if self.fail {
                return Err(TerritoryError::GeocodeFailed {
                    address: address.to_string(),
                    reason: "no match".to_string(),
                });
            }
            Ok(GeoPoint { latitude: 38.8977, longitude: -77.0365 })
        }
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("  1600  Pennsylvania Avenue NW "),
            "1600 pennsylvania avenue nw"
        );
    }

    #[tokio::test]
    async fn test_repeat_lookup_hits_cache() {
        let cache = GeocodeCache::new(FakeGeocoder::new());
        let a = cache.lookup("1600 Pennsylvania Avenue NW").await.unwrap();
        let b = cache.lookup("1600 pennsylvania avenue nw").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.geocoder.calls(), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_single_flight() {
        let cache = Arc::new(GeocodeCache::new(FakeGeocoder::new()));
        let c1 = cache.clone();
        let c2 = cache.clone();
        let (a, b) = tokio::join!(
            async move { c1.lookup("350 Fifth Avenue").await },
            async move { c2.lookup("350 Fifth Avenue").await },
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(cache.geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_stores_nothing() {
        let cache = GeocodeCache::new(FakeGeocoder::failing());
        let err = cache.lookup("nowhere").await.unwrap_err();
        assert!(matches!(err, TerritoryError::GeocodeFailed { .. }));
        assert!(cache.is_empty().await);

        // Retry issues a fresh geocoder call
        let _ = cache.lookup("nowhere").await;
        assert_eq!(cache.geocoder.calls(), 2);
    }

    #[tokio::test]
    async fn test_eviction_is_fifo() {
        let cache = GeocodeCache::with_capacity(FakeGeocoder::new(), 2);
        cache.lookup("first st").await.unwrap();
        cache.lookup("second st").await.unwrap();
        cache.lookup("third st").await.unwrap();
        assert_eq!(cache.len().await, 2);

        // "first st" was evicted, so this is a fresh geocoder call
        cache.lookup("first st").await.unwrap();
        assert_eq!(cache.geocoder.calls(), 4);
    }

    #[tokio::test]
    async fn test_batch_failures_do_not_abort() {
        let cache = GeocodeCache::new(FakeGeocoder::new());
        let results = cache
            .lookup_batch(&["a st".to_string(), "b ave".to_string()])
            .await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    }
}
