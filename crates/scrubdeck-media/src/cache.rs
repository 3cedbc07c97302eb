// crates/scrubdeck-media/src/cache.rs
//
// Thumbnail Cache (§4.A). One process-wide store shared by all three
// queues/workers. `lru::LruCache` handles recency ordering; we track
// `total_cost` separately so capacity is a byte budget, not an entry count,
// matching "a single configurable capacity" more literally than `lru`'s
// built-in count cap.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use scrubdeck_core::cache_entry::CacheEntry;

struct Inner {
    entries:    LruCache<String, CacheEntry>,
    total_cost: usize,
    max_cost:   usize,
}

/// Safe under concurrent access from any thread (§4.A property 1): every
/// method takes the lock for exactly one map operation, never holding it
/// across IO.
pub struct ThumbnailCache {
    inner: Mutex<Inner>,
}

impl ThumbnailCache {
    pub fn new(max_bytes: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                // Effectively unbounded by count — eviction is cost-driven.
                entries:    LruCache::new(NonZeroUsize::new(usize::MAX).unwrap()),
                total_cost: 0,
                max_cost:   max_bytes,
            }),
        })
    }

    /// Insert or replace `key`, promoting it to most-recently-used, then
    /// evict least-recently-used entries until under the cost budget.
    pub fn add(&self, key: String, entry: CacheEntry) {
        let mut inner = self.inner.lock();
        let cost = entry.approx_cost();
        if let Some(old) = inner.entries.put(key, entry) {
            inner.total_cost = inner.total_cost.saturating_sub(old.approx_cost());
        }
        inner.total_cost += cost;
        while inner.total_cost > inner.max_cost {
            match inner.entries.pop_lru() {
                Some((_, evicted)) => inner.total_cost = inner.total_cost.saturating_sub(evicted.approx_cost()),
                None => break,
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.inner.lock().entries.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().entries.contains(key)
    }

    pub fn set_max(&self, max_bytes: usize) {
        let mut inner = self.inner.lock();
        inner.max_cost = max_bytes;
        while inner.total_cost > inner.max_cost {
            match inner.entries.pop_lru() {
                Some((_, evicted)) => inner.total_cost = inner.total_cost.saturating_sub(evicted.approx_cost()),
                None => break,
            }
        }
    }

    pub fn get_max(&self) -> usize {
        self.inner.lock().max_cost
    }

    /// Fraction of capacity occupied, in `[0.0, 1.0]` (capacity 0 reads as
    /// fully occupied rather than dividing by zero).
    pub fn get_percentage(&self) -> f64 {
        let inner = self.inner.lock();
        if inner.max_cost == 0 {
            return 1.0;
        }
        inner.total_cost as f64 / inner.max_cost as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrubdeck_core::cache_entry::{CacheEntry, RasterImage};

    fn thumb(bytes: usize) -> CacheEntry {
        CacheEntry::Thumbnail(RasterImage { width: 1, height: 1, rgba: Arc::new(vec![0u8; bytes]) })
    }

    #[test]
    fn add_then_get_round_trips() {
        let cache = ThumbnailCache::new(1024);
        cache.add("k".into(), thumb(16));
        assert!(cache.contains("k"));
        assert!(matches!(cache.get("k"), Some(CacheEntry::Thumbnail(_))));
    }

    #[test]
    fn eviction_respects_cost_budget() {
        let cache = ThumbnailCache::new(100);
        cache.add("a".into(), thumb(60));
        cache.add("b".into(), thumb(60));
        // "a" should have been evicted to keep total_cost <= 100.
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn shrinking_max_evicts_immediately() {
        let cache = ThumbnailCache::new(1000);
        cache.add("a".into(), thumb(50));
        cache.add("b".into(), thumb(50));
        cache.set_max(60);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }
}
