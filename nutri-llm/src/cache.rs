//! Response cache for repeated structured requests.
//!
//! Maps a hash of (capability, system, prompt) to the provider text that was
//! successfully extracted for it. Reads use `peek`, so entries are never
//! promoted and the oldest insertion is evicted first. Entries older than
//! the TTL are dropped on read.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use crate::types::{Capability, CompletionRequest};

struct Entry {
    text: String,
    inserted: Instant,
}

struct CacheInner {
    entries: LruCache<u64, Entry>,
    hits: u64,
    misses: u64,
    expired: u64,
    evictions: u64,
}

/// Statistics about the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently held.
    pub len: usize,
    /// Reads that found a live entry.
    pub hits: u64,
    /// Reads that found nothing (including expired entries).
    pub misses: u64,
    /// Entries dropped for age.
    pub expired: u64,
    /// Entries dropped for size.
    pub evictions: u64,
}

/// Thread-safe, size-capped, TTL-bounded cache. Clones share storage.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<Mutex<CacheInner>>,
    ttl: Duration,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .field("stats", &self.stats())
            .finish()
    }
}

impl ResponseCache {
    /// Create a cache holding at most `max_entries` (minimum 1).
    #[must_use]
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        let cap = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                entries: LruCache::new(cap),
                hits: 0,
                misses: 0,
                expired: 0,
                evictions: 0,
            })),
            ttl,
        }
    }

    /// Cache key for a request serving `capability`.
    #[must_use]
    pub fn key(capability: Capability, request: &CompletionRequest) -> u64 {
        let mut hasher = DefaultHasher::new();
        capability.hash(&mut hasher);
        request.system.hash(&mut hasher);
        request.prompt.hash(&mut hasher);
        hasher.finish()
    }

    /// Look up a live entry.
    #[must_use]
    pub fn get(&self, key: u64) -> Option<String> {
        let mut inner = self.inner.lock();

        let state = inner
            .entries
            .peek(&key)
            .map(|e| (e.inserted.elapsed() >= self.ttl, e.text.clone()));

        match state {
            Some((false, text)) => {
                inner.hits += 1;
                Some(text)
            }
            Some((true, _)) => {
                inner.entries.pop(&key);
                inner.expired += 1;
                inner.misses += 1;
                None
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store text under `key`, evicting the oldest entry when full.
    pub fn insert(&self, key: u64, text: impl Into<String>) {
        let mut inner = self.inner.lock();
        let entry = Entry {
            text: text.into(),
            inserted: Instant::now(),
        };
        if let Some((old_key, _)) = inner.entries.push(key, entry) {
            if old_key != key {
                inner.evictions += 1;
            }
        }
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            len: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
            expired: inner.expired,
            evictions: inner.evictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn hit_and_miss() {
        let cache = ResponseCache::new(4, HOUR);
        cache.insert(1, "plan");
        assert_eq!(cache.get(1).as_deref(), Some("plan"));
        assert_eq!(cache.get(2), None);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn oldest_insertion_is_evicted_even_after_reads() {
        let cache = ResponseCache::new(2, HOUR);
        cache.insert(1, "a");
        cache.insert(2, "b");
        // Reading 1 does not promote it.
        assert!(cache.get(1).is_some());
        cache.insert(3, "c");
        assert_eq!(cache.get(1), None);
        assert!(cache.get(2).is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = ResponseCache::new(4, Duration::ZERO);
        cache.insert(1, "a");
        assert_eq!(cache.get(1), None);
        let stats = cache.stats();
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.len, 0);
    }

    #[test]
    fn overwrite_is_not_an_eviction() {
        let cache = ResponseCache::new(1, HOUR);
        cache.insert(7, "old");
        cache.insert(7, "new");
        assert_eq!(cache.get(7).as_deref(), Some("new"));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn clones_share_storage() {
        let cache = ResponseCache::new(4, HOUR);
        let other = cache.clone();
        other.insert(5, "shared");
        assert_eq!(cache.get(5).as_deref(), Some("shared"));
    }

    #[test]
    fn key_depends_on_capability_and_prompt() {
        let req = CompletionRequest::new("same prompt");
        assert_ne!(
            ResponseCache::key(Capability::Analyze, &req),
            ResponseCache::key(Capability::Plan, &req)
        );
        assert_eq!(
            ResponseCache::key(Capability::Plan, &req),
            ResponseCache::key(Capability::Plan, &req.clone())
        );
    }
}
