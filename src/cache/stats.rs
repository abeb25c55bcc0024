//! Counters describing what the cache has done since it was built.

use serde::Serialize;

/// Snapshot of cache activity.
///
/// `hits`, `misses` and `evictions` accumulate over the cache's lifetime.
/// `total_entries` and `used_bytes` describe residency at the moment the
/// snapshot was taken by [`LruCache::stats`](crate::cache::LruCache::stats).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries that left through `remove_oldest`, whether called directly or by budget enforcement
    pub evictions: u64,
    pub total_entries: usize,
    /// Key plus value bytes charged to resident entries
    pub used_bytes: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of lookups that hit, 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }

    pub(crate) fn set_used_bytes(&mut self, bytes: usize) {
        self.used_bytes = bytes;
    }
}
