//! Cache Store Module
//!
//! Main cache engine combining a key index with the recency list and a byte budget.

use std::collections::HashMap;
use std::fmt;

use crate::cache::{CacheStats, CacheValue, Handle, RecencyList};

/// Called with the key and value of every entry that leaves the cache.
pub type EvictionCallback<V> = Box<dyn FnMut(String, V) + Send>;

struct Entry<V> {
    key: String,
    value: V,
}

/// Bytes charged for one entry. Saturates so a huge value reads as over any budget.
fn charge<V: CacheValue>(key: &str, value: &V) -> usize {
    key.len().saturating_add(value.size())
}

// == LRU Cache ==
/// Byte-bounded least-recently-used cache.
///
/// Every entry is charged `key.len() + value.size()` bytes. When a non-zero
/// budget is set, `add` evicts from the back of the recency list until the
/// charged total fits again or nothing is left.
///
/// Not safe for concurrent access: wrap it in a lock when sharing it between
/// tasks. The eviction callback runs on the caller's thread and must not call
/// back into the cache.
pub struct LruCache<V> {
    /// Key to recency-list position
    index: HashMap<String, Handle>,
    /// Entries ordered front (most recent) to back (least recent)
    list: RecencyList<Entry<V>>,
    /// Bytes charged to resident entries
    nbytes: usize,
    /// Byte budget, 0 means unbounded
    max_bytes: usize,
    on_evicted: Option<EvictionCallback<V>>,
    stats: CacheStats,
}

impl<V: CacheValue> LruCache<V> {
    // == Constructor ==
    /// Creates a cache with the given byte budget and no eviction callback.
    ///
    /// # Arguments
    /// * `max_bytes` - Byte budget; `0` disables size-triggered eviction
    pub fn new(max_bytes: usize) -> Self {
        Self {
            index: HashMap::new(),
            list: RecencyList::new(),
            nbytes: 0,
            max_bytes,
            on_evicted: None,
            stats: CacheStats::new(),
        }
    }

    /// Creates a cache that reports every evicted entry to `on_evicted`.
    pub fn with_eviction_callback<F>(max_bytes: usize, on_evicted: F) -> Self
    where
        F: FnMut(String, V) + Send + 'static,
    {
        Self {
            on_evicted: Some(Box::new(on_evicted)),
            ..Self::new(max_bytes)
        }
    }

    // == Get ==
    /// Looks up a key, marking it as most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        match self.index.get(key).copied() {
            Some(handle) => {
                self.list.move_to_front(handle);
                self.stats.record_hit();
                self.list.get(handle).map(|entry| &entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Add ==
    /// Inserts or replaces a value, then evicts until the budget holds.
    ///
    /// Replacing an existing key keeps the entry count unchanged and charges
    /// only the difference in value size. An entry larger than the whole
    /// budget is evicted right after insertion, leaving the cache empty.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&handle) = self.index.get(&key) {
            self.list.move_to_front(handle);
            if let Some(entry) = self.list.get_mut(handle) {
                self.nbytes = self
                    .nbytes
                    .saturating_sub(entry.value.size())
                    .saturating_add(value.size());
                entry.value = value;
            }
        } else {
            self.nbytes = self.nbytes.saturating_add(charge(&key, &value));
            let handle = self.list.push_front(Entry {
                key: key.clone(),
                value,
            });
            self.index.insert(key, handle);
        }

        while self.max_bytes != 0 && self.max_bytes < self.nbytes {
            if !self.remove_oldest() {
                break;
            }
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry.
    ///
    /// Returns false when the cache is empty. The evicted pair is handed to
    /// the eviction callback if one is configured.
    pub fn remove_oldest(&mut self) -> bool {
        let Some(handle) = self.list.back() else {
            return false;
        };
        let Some(Entry { key, value }) = self.list.remove(handle) else {
            return false;
        };

        self.index.remove(&key);
        self.nbytes = self.nbytes.saturating_sub(charge(&key, &value));
        self.stats.record_eviction();

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(key, value);
        }
        true
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Bytes currently charged to resident entries.
    pub fn nbytes(&self) -> usize {
        self.nbytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Checks for a key without touching recency order.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The next eviction candidate, without touching recency order.
    pub fn peek_oldest(&self) -> Option<(&str, &V)> {
        self.list
            .back()
            .and_then(|handle| self.list.get(handle))
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.list.iter().map(|entry| entry.key.as_str())
    }

    /// Keys whose index handle does not lead back to a list node with the same key.
    #[cfg(test)]
    pub(crate) fn index_mismatches(&self) -> Vec<String> {
        let mut mismatches: Vec<String> = self
            .index
            .iter()
            .filter(|(key, handle)| {
                self.list
                    .get(**handle)
                    .map_or(true, |entry| entry.key != **key)
            })
            .map(|(key, _)| key.clone())
            .collect();
        if self.index.len() != self.list.len() {
            mismatches.extend(
                self.keys()
                    .filter(|key| !self.index.contains_key(*key))
                    .map(str::to_string),
            );
        }
        mismatches
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len());
        stats.set_used_bytes(self.nbytes);
        stats
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.list.len())
            .field("nbytes", &self.nbytes)
            .field("max_bytes", &self.max_bytes)
            .field("on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Evicted = Arc<Mutex<Vec<(String, String)>>>;

    fn recording_cache(max_bytes: usize) -> (LruCache<String>, Evicted) {
        let evicted: Evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = evicted.clone();
        let cache = LruCache::with_eviction_callback(max_bytes, move |key, value| {
            sink.lock().unwrap().push((key, value));
        });
        (cache, evicted)
    }

    fn keys(cache: &LruCache<String>) -> Vec<&str> {
        cache.keys().collect()
    }

    #[test]
    fn test_cache_new() {
        let cache: LruCache<String> = LruCache::new(100);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.nbytes(), 0);
        assert_eq!(cache.max_bytes(), 100);
    }

    #[test]
    fn test_add_and_get() {
        let mut cache = LruCache::new(0);

        cache.add("key1", "value1".to_string());
        assert_eq!(cache.get("key1"), Some(&"value1".to_string()));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.nbytes(), "key1".len() + "value1".len());
    }

    #[test]
    fn test_get_missing_key() {
        let mut cache: LruCache<String> = LruCache::new(0);
        cache.add("a", "1".to_string());

        assert!(cache.get("nonexistent").is_none());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.nbytes(), 2);
    }

    #[test]
    fn test_budget_walkthrough() {
        // every entry costs 1 key byte + 3 value bytes
        let (mut cache, evicted) = recording_cache(10);

        cache.add("a", "aaa".to_string());
        assert_eq!(cache.nbytes(), 4);

        cache.add("b", "bbb".to_string());
        assert_eq!(keys(&cache), vec!["b", "a"]);
        assert_eq!(cache.nbytes(), 8);

        cache.add("c", "ccc".to_string());
        assert_eq!(keys(&cache), vec!["c", "b"]);
        assert_eq!(cache.nbytes(), 8);
        assert_eq!(
            *evicted.lock().unwrap(),
            vec![("a".to_string(), "aaa".to_string())]
        );

        assert!(cache.get("b").is_some());
        assert_eq!(keys(&cache), vec!["b", "c"]);

        assert!(cache.get("a").is_none());
        assert_eq!(keys(&cache), vec!["b", "c"]);
        assert_eq!(evicted.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let (mut cache, evicted) = recording_cache(0);

        for i in 0..1000 {
            cache.add(format!("key{}", i), "x".repeat(64));
            assert_eq!(cache.len(), i + 1);
        }
        assert!(evicted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_overwrite_applies_size_delta() {
        let mut cache = LruCache::new(0);
        cache.add("k", "short".to_string());
        cache.add("other", "v".to_string());

        cache.add("k", "a much longer value".to_string());
        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.nbytes(),
            "k".len() + "a much longer value".len() + "other".len() + "v".len()
        );
        assert_eq!(keys(&cache), vec!["k", "other"]);

        cache.add("k", "".to_string());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.nbytes(), "k".len() + "other".len() + "v".len());
        assert_eq!(cache.get("k"), Some(&String::new()));
    }

    #[test]
    fn test_overwrite_can_trigger_eviction() {
        let (mut cache, evicted) = recording_cache(10);
        cache.add("a", "aaa".to_string());
        cache.add("b", "bbb".to_string());

        // "a" moves to front and grows past the budget, so "b" goes
        cache.add("a", "aaaaaa".to_string());
        assert_eq!(keys(&cache), vec!["a"]);
        assert_eq!(cache.nbytes(), 7);
        assert_eq!(
            *evicted.lock().unwrap(),
            vec![("b".to_string(), "bbb".to_string())]
        );
    }

    #[test]
    fn test_get_changes_eviction_order() {
        let (mut cache, evicted) = recording_cache(12);
        cache.add("a", "aaa".to_string());
        cache.add("b", "bbb".to_string());
        cache.add("c", "ccc".to_string());

        cache.get("a");
        cache.add("d", "ddd".to_string());

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert_eq!(evicted.lock().unwrap()[0].0, "b");
    }

    #[test]
    fn test_oversized_entry_empties_cache() {
        let (mut cache, evicted) = recording_cache(10);
        cache.add("a", "aaa".to_string());

        cache.add("big", "x".repeat(20));

        assert!(cache.is_empty());
        assert_eq!(cache.nbytes(), 0);
        let evicted = evicted.lock().unwrap();
        assert_eq!(evicted.len(), 2);
        assert_eq!(evicted[0].0, "a");
        assert_eq!(evicted[1].0, "big");
    }

    #[test]
    fn test_remove_oldest() {
        let (mut cache, evicted) = recording_cache(0);
        cache.add("key1", "v1".to_string());
        cache.add("key2", "v2".to_string());

        assert_eq!(cache.peek_oldest(), Some(("key1", &"v1".to_string())));
        assert!(cache.remove_oldest());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.nbytes(), 6);
        assert!(!cache.contains("key1"));
        assert_eq!(
            *evicted.lock().unwrap(),
            vec![("key1".to_string(), "v1".to_string())]
        );
    }

    #[test]
    fn test_remove_oldest_empty() {
        let (mut cache, evicted) = recording_cache(0);
        assert!(!cache.remove_oldest());
        assert!(evicted.lock().unwrap().is_empty());
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_remove_oldest_without_callback() {
        let mut cache = LruCache::new(0);
        cache.add("a", vec![1u8, 2, 3]);
        assert!(cache.remove_oldest());
        assert!(cache.is_empty());
        assert!(cache.peek_oldest().is_none());
    }

    #[test]
    fn test_stats() {
        let mut cache = LruCache::new(10);
        cache.add("a", "aaa".to_string());
        cache.add("b", "bbb".to_string());
        cache.add("c", "ccc".to_string());
        cache.get("c"); // hit
        cache.get("a"); // miss, already evicted

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.used_bytes, 8);
    }

    /// Value with an arbitrary self-reported size.
    struct Reported(usize);

    impl CacheValue for Reported {
        fn size(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn test_huge_value_saturates_and_is_evicted() {
        let mut cache = LruCache::new(10);
        cache.add("a", Reported(usize::MAX));

        assert!(cache.is_empty());
        assert_eq!(cache.nbytes(), 0);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_huge_values_saturate_when_unbounded() {
        let mut cache = LruCache::new(0);
        cache.add("a", Reported(usize::MAX));
        cache.add("b", Reported(usize::MAX));

        // the counter pins at the ceiling instead of wrapping
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.nbytes(), usize::MAX);
    }

    #[test]
    fn test_update_to_huge_value_is_evicted() {
        let mut cache = LruCache::new(32);
        cache.add("small", Reported(1));
        cache.add("grow", Reported(1));

        cache.add("grow", Reported(usize::MAX));

        assert!(cache.is_empty());
        assert_eq!(cache.nbytes(), 0);
        assert_eq!(cache.stats().evictions, 2);
    }

    #[test]
    fn test_index_matches_list_after_churn() {
        let mut cache = LruCache::new(12);
        for round in 0..50 {
            let key = format!("k{}", round % 7);
            cache.add(key, "vv".to_string());
            cache.get(&format!("k{}", round % 3));
            if round % 5 == 0 {
                cache.remove_oldest();
            }
            assert!(cache.index_mismatches().is_empty());
            assert_eq!(cache.keys().count(), cache.len());
        }
    }

    #[test]
    fn test_debug_output() {
        let cache: LruCache<String> = LruCache::new(64);
        let debug = format!("{:?}", cache);
        assert!(debug.contains("max_bytes: 64"));
        assert!(debug.contains("on_evicted: false"));
    }
}
