//! Single-value cache with a time-to-live, guarded by one mutex.
//!
//! Callers pass `now` explicitly so expiry is deterministic under test.
//! The lock is held only for the duration of a clone or a store, never
//! across an await point.
//!
//! A loader reads [`TtlCache::generation`] before fetching and hands it back
//! to [`TtlCache::store`]; an [`TtlCache::invalidate`] in between bumps the
//! generation and the stale value is dropped instead of cached.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default lifetime of a cached value (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

struct Slot<T> {
    generation: u64,
    entry: Option<Entry<T>>,
}

/// Cache-aside holder for one value.
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Slot<T>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(Slot {
                generation: 0,
                entry: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return a clone of the cached value if it is younger than the TTL.
    pub fn get(&self, now: Instant) -> Option<T> {
        self.lock()
            .entry
            .as_ref()
            .filter(|e| now.saturating_duration_since(e.stored_at) < self.ttl)
            .map(|e| e.value.clone())
    }

    /// Token to pass to [`TtlCache::store`] after loading a fresh value.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Cache `value` unless the cache was invalidated since `generation` was
    /// read. Returns whether the value was stored.
    pub fn store(&self, value: T, generation: u64, now: Instant) -> bool {
        let mut slot = self.lock();
        if slot.generation != generation {
            return false;
        }
        slot.entry = Some(Entry {
            value,
            stored_at: now,
        });
        true
    }

    /// Drop the cached value so the next read reloads it.
    pub fn invalidate(&self) {
        let mut slot = self.lock();
        slot.generation = slot.generation.wrapping_add(1);
        slot.entry = None;
    }
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_misses() {
        let cache: TtlCache<u32> = TtlCache::default();
        assert_eq!(cache.get(Instant::now()), None);
    }

    #[test]
    fn value_is_served_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        assert!(cache.store(vec![1, 2, 3], cache.generation(), t0));

        assert_eq!(cache.get(t0), Some(vec![1, 2, 3]));
        assert_eq!(cache.get(t0 + Duration::from_secs(299)), Some(vec![1, 2, 3]));
    }

    #[test]
    fn value_expires_at_ttl() {
        let cache = TtlCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.store("catalog".to_string(), cache.generation(), t0);

        assert_eq!(cache.get(t0 + Duration::from_secs(300)), None);
    }

    #[test]
    fn invalidate_clears_value() {
        let cache = TtlCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.store(7u8, cache.generation(), t0);
        cache.invalidate();
        assert_eq!(cache.get(t0), None);
    }

    #[test]
    fn store_replaces_and_restarts_clock() {
        let cache = TtlCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.store(1u8, cache.generation(), t0);
        let t1 = t0 + Duration::from_secs(8);
        cache.store(2u8, cache.generation(), t1);
        assert_eq!(cache.get(t0 + Duration::from_secs(15)), Some(2));
    }

    #[test]
    fn load_started_before_invalidate_is_not_cached() {
        let cache = TtlCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        let generation = cache.generation();

        cache.invalidate();

        assert!(!cache.store("stale", generation, t0));
        assert_eq!(cache.get(t0), None);

        assert!(cache.store("fresh", cache.generation(), t0));
        assert_eq!(cache.get(t0), Some("fresh"));
    }
}
