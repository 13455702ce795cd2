//! Short-lived full-response cache for the index page.
//!
//! A bounded map of request path to rendered body with a fixed TTL and
//! no write invalidation: a freshly created post may stay invisible on
//! the index for up to the TTL. Entries expire on read; when the map is
//! full the oldest entry is evicted.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A cached rendered response
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug)]
struct Entry {
    page: CachedPage,
    stored_at: Instant,
    expires_at: Instant,
}

/// Bounded time-expiring page cache keyed by request path.
pub struct PageCache {
    ttl: Duration,
    max_entries: usize,
    inner: Mutex<HashMap<String, Entry>>,
}

impl PageCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a live entry, dropping it if expired.
    pub fn get(&self, key: &str) -> Option<CachedPage> {
        let mut map = self.inner.lock().expect("page cache lock poisoned");

        match map.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                tracing::debug!(key, "page cache HIT");
                Some(entry.page.clone())
            }
            Some(_) => {
                map.remove(key);
                tracing::debug!(key, "page cache EXPIRED");
                None
            }
            None => {
                tracing::debug!(key, "page cache MISS");
                None
            }
        }
    }

    /// Store a rendered response, evicting the oldest entry when full.
    pub fn put(&self, key: String, page: CachedPage) {
        let now = Instant::now();
        let mut map = self.inner.lock().expect("page cache lock poisoned");

        if !map.contains_key(&key) && map.len() >= self.max_entries {
            if let Some(oldest) = map
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(k, _)| k.clone())
            {
                map.remove(&oldest);
            }
        }

        map.insert(
            key,
            Entry {
                page,
                stored_at: now,
                expires_at: now + self.ttl,
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().expect("page cache lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> CachedPage {
        CachedPage {
            body: body.as_bytes().to_vec(),
            content_type: "application/json".to_string(),
        }
    }

    #[test]
    fn hit_within_ttl() {
        let cache = PageCache::new(Duration::from_secs(20), 16);
        cache.put("/".to_string(), page("first"));

        let hit = cache.get("/").expect("fresh entry");
        assert_eq!(hit.body, b"first");
    }

    #[test]
    fn expires_after_ttl() {
        let cache = PageCache::new(Duration::from_millis(30), 16);
        cache.put("/".to_string(), page("stale"));

        std::thread::sleep(Duration::from_millis(60));
        assert!(cache.get("/").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn distinct_paths_cache_separately() {
        let cache = PageCache::new(Duration::from_secs(20), 16);
        cache.put("/?page=1".to_string(), page("one"));
        cache.put("/?page=2".to_string(), page("two"));

        assert_eq!(cache.get("/?page=1").unwrap().body, b"one");
        assert_eq!(cache.get("/?page=2").unwrap().body, b"two");
    }

    #[test]
    fn capacity_bound_evicts_oldest() {
        let cache = PageCache::new(Duration::from_secs(20), 2);
        cache.put("a".to_string(), page("a"));
        std::thread::sleep(Duration::from_millis(5));
        cache.put("b".to_string(), page("b"));
        std::thread::sleep(Duration::from_millis(5));
        cache.put("c".to_string(), page("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn rewriting_a_key_does_not_evict_others() {
        let cache = PageCache::new(Duration::from_secs(20), 2);
        cache.put("a".to_string(), page("a1"));
        cache.put("b".to_string(), page("b"));
        cache.put("a".to_string(), page("a2"));

        assert_eq!(cache.get("a").unwrap().body, b"a2");
        assert!(cache.get("b").is_some());
    }
}
