//! Bounded result cache keyed by (url, content hash, context).
//!
//! Avoids redundant inference calls for an unchanged page: the content hash
//! changes when the page does, so stale entries simply stop being hit.
//! Entries also age out, and the oldest entry is evicted at capacity.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

use crate::context::PageContext;
use crate::types::event::RawEvent;

/// Cache key for one extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub url: String,
    pub content_hash: String,
    pub context: PageContext,
}

struct CacheEntry {
    key: CacheKey,
    events: Vec<RawEvent>,
    inserted_at: Instant,
}

/// Bounded, age-pruned cache of raw extraction results.
pub struct ResultCache {
    entries: VecDeque<CacheEntry>,
    capacity: usize,
    max_age: Duration,
}

impl ResultCache {
    /// Create a cache with the given capacity and entry lifetime.
    pub fn new(capacity: usize, max_age: Duration) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            max_age,
        }
    }

    /// Look up a cached result.
    pub fn get(&mut self, key: &CacheKey) -> Option<Vec<RawEvent>> {
        self.prune();
        self.entries
            .iter()
            .find(|e| &e.key == key)
            .map(|e| e.events.clone())
    }

    /// Insert a result, replacing any entry with the same key and evicting
    /// the oldest entry at capacity.
    pub fn insert(&mut self, key: CacheKey, events: Vec<RawEvent>) {
        self.prune();
        self.entries.retain(|e| e.key != key);
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(CacheEntry {
            key,
            events,
            inserted_at: Instant::now(),
        });
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn prune(&mut self) {
        let max_age = self.max_age;
        self.entries.retain(|e| e.inserted_at.elapsed() <= max_age);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(url: &str) -> CacheKey {
        CacheKey {
            url: url.into(),
            content_hash: "h".into(),
            context: PageContext::Dashboard,
        }
    }

    #[tokio::test]
    async fn test_hit_and_miss() {
        let mut cache = ResultCache::new(10, Duration::from_secs(300));
        assert!(cache.get(&key("a")).is_none());

        cache.insert(key("a"), vec![RawEvent::new("Essay 1")]);
        let hit = cache.get(&key("a")).unwrap();
        assert_eq!(hit.len(), 1);

        // Different hash is a different key
        let mut other = key("a");
        other.content_hash = "h2".into();
        assert!(cache.get(&other).is_none());
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let mut cache = ResultCache::new(2, Duration::from_secs(300));
        cache.insert(key("a"), vec![]);
        cache.insert(key("b"), vec![]);
        cache.insert(key("c"), vec![]);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key("a")).is_none());
        assert!(cache.get(&key("c")).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_age_out() {
        let mut cache = ResultCache::new(10, Duration::from_secs(60));
        cache.insert(key("a"), vec![]);
        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.get(&key("a")).is_none());
        assert!(cache.is_empty());
    }
}
