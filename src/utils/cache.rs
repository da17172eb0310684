//! In-memory cache with a fixed time-to-live.
//!
//! Entries are never deleted on expiry; a stale entry simply stops being a hit
//! and is overwritten by the next `set` for the same key. The cache lives as long
//! as the value owning it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::clock::{Clock, SystemClock};

/// Result of a cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    /// Item was found and is valid
    Hit(T),

    /// Item was not found
    Miss,

    /// Item was found but has expired
    Expired,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Normalize a free-text key: trimmed and lower-cased
pub fn cache_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Thread-safe TTL cache keyed by normalized strings
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a key; the key is normalized with [`cache_key`]
    pub fn get(&self, key: &str) -> CacheResult<V> {
        let key = cache_key(key);
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        match entries.get(&key) {
            Some(entry) if self.clock.now().duration_since(entry.stored_at) < self.ttl => {
                CacheResult::Hit(entry.value.clone())
            }
            Some(_) => CacheResult::Expired,
            None => CacheResult::Miss,
        }
    }

    /// Store a value, replacing any previous entry for the key
    pub fn set(&self, key: &str, value: V) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(cache_key(key), entry);
    }

    /// Number of stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::ManualClock;

    #[test]
    fn test_hit_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("Jane Smith", vec![1, 2, 3]);

        assert_eq!(cache.get("Jane Smith"), CacheResult::Hit(vec![1, 2, 3]));
    }

    #[test]
    fn test_keys_are_normalized() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("  Jane Smith ", 7);

        assert_eq!(cache.get("jane smith"), CacheResult::Hit(7));
        assert_eq!(cache.get("JANE SMITH"), CacheResult::Hit(7));
    }

    #[test]
    fn test_expired_entries_are_kept_but_not_served() {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock(Duration::from_secs(30 * 60), clock.clone());
        cache.set("jane smith", "papers");

        clock.advance(Duration::from_secs(29 * 60));
        assert_eq!(cache.get("jane smith"), CacheResult::Hit("papers"));

        clock.advance(Duration::from_secs(2 * 60));
        assert_eq!(cache.get("jane smith"), CacheResult::Expired);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_miss_and_overwrite() {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock(Duration::from_secs(10), clock.clone());
        assert_eq!(cache.get("nobody"), CacheResult::<u8>::Miss);

        cache.set("a", 1);
        clock.advance(Duration::from_secs(11));
        cache.set("a", 2);
        assert_eq!(cache.get("a"), CacheResult::Hit(2));
    }
}
