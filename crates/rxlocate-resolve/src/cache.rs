//! Injected key/value caches for the search pipeline.
//!
//! [`PharmacySearch`](crate::PharmacySearch) never owns a hidden global
//! cache; callers pass a [`TtlCache`] in production and a [`NoopCache`] (or a
//! short-TTL cache) in tests.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use rxlocate_core::LatLon;

const DEFAULT_MAX_ENTRIES: usize = 1_024;

pub trait Cache<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;
    fn set(&self, key: String, value: V);
    fn invalidate(&self, key: &str);
    fn clear(&self);
}

/// A cache that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl<V> Cache<V> for NoopCache {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn set(&self, _key: String, _value: V) {}

    fn invalidate(&self, _key: &str) {}

    fn clear(&self) {}
}

/// In-memory cache whose entries expire `ttl` after insertion.
///
/// Bounded to `max_entries`; when full, expired entries are purged first and
/// then the oldest entry is evicted.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<HashMap<String, (Instant, V)>>,
}

impl<V> TtlCache<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_MAX_ENTRIES)
    }

    #[must_use]
    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (Instant, V)>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone + Send> Cache<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some((inserted, value)) if inserted.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: String, value: V) {
        let mut entries = self.lock();
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let ttl = self.ttl;
            entries.retain(|_, (inserted, _)| inserted.elapsed() < ttl);
            if entries.len() >= self.max_entries {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, (inserted, _))| *inserted)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                }
            }
        }
        entries.insert(key, (Instant::now(), value));
    }

    fn invalidate(&self, key: &str) {
        self.lock().remove(key);
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

/// Key for an authoritative search: trimmed lower-case query plus origin
/// rounded to two decimal places (~0.7 mile cells).
#[must_use]
pub fn search_cache_key(query: &str, origin: LatLon) -> String {
    format!(
        "search:{}:{}",
        query.trim().to_lowercase(),
        rounded(origin)
    )
}

/// Key for a local nearby lookup: origin rounded to two decimal places.
#[must_use]
pub fn nearby_cache_key(origin: LatLon) -> String {
    format!("nearby:{}", rounded(origin))
}

fn rounded(origin: LatLon) -> String {
    format!("{:.2},{:.2}", origin.lat, origin.lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_cache_never_returns_values() {
        let cache = NoopCache;
        Cache::<u32>::set(&cache, "k".to_string(), 1);
        assert_eq!(Cache::<u32>::get(&cache, "k"), None);
    }

    #[test]
    fn ttl_cache_returns_fresh_values() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("k".to_string(), vec![1, 2]);
        assert_eq!(cache.get("k"), Some(vec![1, 2]));
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.set("k".to_string(), 7);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty(), "expired entry should be dropped on read");
    }

    #[test]
    fn invalidate_and_clear_remove_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        cache.invalidate("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn full_cache_evicts_oldest_entry() {
        let cache = TtlCache::with_capacity(Duration::from_secs(60), 2);
        cache.set("a".to_string(), 1);
        std::thread::sleep(Duration::from_millis(2));
        cache.set("b".to_string(), 2);
        cache.set("c".to_string(), 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn search_key_normalizes_query_and_rounds_origin() {
        let a = search_cache_key("  CVS ", LatLon::new(40.001, -75.004));
        let b = search_cache_key("cvs", LatLon::new(39.998, -74.996));
        assert_eq!(a, b);
        assert_eq!(a, "search:cvs:40.00,-75.00");
    }

    #[test]
    fn nearby_key_uses_rounded_origin() {
        assert_eq!(
            nearby_cache_key(LatLon::new(30.267_2, -97.743_1)),
            "nearby:30.27,-97.74"
        );
    }
}
