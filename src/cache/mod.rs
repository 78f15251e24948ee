//! Result cache
//!
//! Bridges asynchronous fetch results to the later synchronous metadata and
//! activation lookups. Sentinels live outside the bounded store so no
//! capacity or TTL setting can ever evict them.

use crate::config::CacheSettings;
use crate::results::{CacheEntry, ImageResult, Sentinel};
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Id-keyed store of the last known image records plus the fixed sentinels
pub struct ResultCache {
    records: Cache<String, Arc<ImageResult>>,
}

impl ResultCache {
    /// Create an unbounded cache
    pub fn new() -> Self {
        Self::with_settings(&CacheSettings::default())
    }

    /// Create a cache with optional capacity and TTL bounds
    pub fn with_settings(settings: &CacheSettings) -> Self {
        let mut builder = Cache::builder();
        if let Some(capacity) = settings.max_capacity {
            // Newest records always win admission.
            builder = builder
                .max_capacity(capacity)
                .eviction_policy(EvictionPolicy::lru());
        }
        if let Some(ttl) = settings.ttl_seconds {
            builder = builder.time_to_live(Duration::from_secs(ttl));
        }

        Self {
            records: builder.build(),
        }
    }

    /// Store a record, replacing any earlier one under the same id
    pub fn put(&self, id: String, record: ImageResult) {
        self.records.insert(id, Arc::new(record));
    }

    /// Store every record under its own id and return the ids in order
    pub fn put_all(&self, records: Vec<ImageResult>) -> Vec<String> {
        records
            .into_iter()
            .map(|record| {
                let id = record.result_id();
                self.put(id.clone(), record);
                id
            })
            .collect()
    }

    /// Look up one id
    pub fn get(&self, id: &str) -> Option<CacheEntry> {
        if let Some(sentinel) = Sentinel::from_id(id) {
            return Some(CacheEntry::Sentinel(sentinel));
        }
        self.records.get(id).map(CacheEntry::Record)
    }

    /// Look up a record, ignoring sentinels
    pub fn get_record(&self, id: &str) -> Option<Arc<ImageResult>> {
        self.records.get(id)
    }

    /// Look up several ids, preserving their order and skipping unknown ones
    pub fn get_many<S: AsRef<str>>(&self, ids: &[S]) -> Vec<(String, CacheEntry)> {
        ids.iter()
            .filter_map(|id| {
                let id = id.as_ref();
                self.get(id).map(|entry| (id.to_string(), entry))
            })
            .collect()
    }

    /// Whether a record (not a sentinel) is cached under `id`
    pub fn contains_record(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Drop all records; sentinels stay
    pub fn clear(&self) {
        self.records.invalidate_all();
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::sample_image;

    #[test]
    fn test_put_and_get() {
        let cache = ResultCache::new();
        cache.put("101".to_string(), sample_image(101, "cat"));

        let entry = cache.get("101").unwrap();
        assert_eq!(entry.as_record().unwrap().tags, "cat");
        assert!(cache.get("102").is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let cache = ResultCache::new();
        cache.put("101".to_string(), sample_image(101, "cat"));
        cache.put("101".to_string(), sample_image(101, "dog"));

        assert_eq!(cache.get_record("101").unwrap().tags, "dog");
    }

    #[test]
    fn test_sentinels_always_present() {
        let cache = ResultCache::new();
        cache.clear();

        for sentinel in Sentinel::ALL {
            assert_eq!(cache.get(sentinel.id()), Some(CacheEntry::Sentinel(sentinel)));
            assert!(!cache.contains_record(sentinel.id()));
        }
    }

    #[test]
    fn test_bounded_cache_admits_new_result_set() {
        let cache = ResultCache::with_settings(&CacheSettings {
            max_capacity: Some(2),
            ttl_seconds: None,
        });
        cache.put_all(vec![sample_image(1, "dog"), sample_image(2, "dog")]);
        for _ in 0..5 {
            assert_eq!(cache.get_many(&["1", "2"]).len(), 2);
        }

        let ids = cache.put_all(vec![sample_image(3, "cat"), sample_image(4, "cat")]);
        cache.records.run_pending_tasks();

        let found: Vec<String> = cache.get_many(&ids).into_iter().map(|(id, _)| id).collect();
        assert_eq!(found, vec!["3", "4"]);
    }

    #[test]
    fn test_get_many_preserves_order_and_skips_unknown() {
        let cache = ResultCache::new();
        let ids = cache.put_all(vec![sample_image(1, "a"), sample_image(2, "b")]);
        assert_eq!(ids, vec!["1", "2"]);

        let entries = cache.get_many(&["2", "missing", "__error__", "1"]);
        let found: Vec<&str> = entries.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(found, vec!["2", "__error__", "1"]);
    }
}
