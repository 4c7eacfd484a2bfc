//! Process-wide TTL read cache.
//!
//! A string-keyed map with one global time-to-live. Reads of an expired
//! entry count as a miss and evict it. There is no stampede protection:
//! concurrent misses may both repopulate a key and the last writer wins.
//!
//! Writers are responsible for invalidation. See [`keys`] for the key
//! layout used by the gallery.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::lock::{rw_read, rw_write};

/// Default TTL for cached reads: 5 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60 * 60);

/// Longest TTL a cache accepts: 24 hours. Longer values are clamped.
pub const MAX_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cache key layout.
pub mod keys {
    use crate::types::DbId;

    /// Key of the full image listing.
    pub const IMAGES: &str = "images";

    /// Key of a single image with its captions.
    pub fn image(id: DbId) -> String {
        format!("image_{id}")
    }
}

const TARGET: &str = "cache";

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory key/value cache with a fixed TTL.
pub struct ReadCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    ttl: Duration,
}

impl<V: Clone> ReadCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: ttl.min(MAX_TTL),
        }
    }

    /// Look up `key`. Expired entries are removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = rw_read(&self.entries, TARGET, "get");
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = rw_write(&self.entries, TARGET, "get.evict");
        // Re-check under the write lock; a writer may have refreshed the key.
        if let Some(entry) = entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }
        None
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        rw_write(&self.entries, TARGET, "set").insert(key.into(), entry);
    }

    /// Remove `key`. Returns `true` if an entry (live or expired) was removed.
    pub fn del(&self, key: &str) -> bool {
        rw_write(&self.entries, TARGET, "del").remove(key).is_some()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        rw_read(&self.entries, TARGET, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, TARGET, "purge_expired");
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_value_after_set() {
        let cache = ReadCache::new(DEFAULT_TTL);
        cache.set(keys::IMAGES, vec![1, 2, 3]);

        assert_eq!(cache.get(keys::IMAGES), Some(vec![1, 2, 3]));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn del_invalidates_only_the_given_key() {
        let cache = ReadCache::new(DEFAULT_TTL);
        cache.set(keys::IMAGES, "listing");
        cache.set(keys::image(3), "three");
        cache.set(keys::image(4), "four");

        assert!(cache.del(&keys::image(3)));
        assert!(!cache.del(&keys::image(3)), "second delete finds nothing");

        assert_eq!(cache.get(&keys::image(3)), None);
        assert_eq!(cache.get(&keys::image(4)), Some("four"));
        assert_eq!(cache.get(keys::IMAGES), Some("listing"));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let cache = ReadCache::new(DEFAULT_TTL);
        cache.set("k", 1);
        cache.set("k", 2);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entries_are_misses() {
        let cache = ReadCache::new(Duration::from_millis(10));
        cache.set("k", "v");
        std::thread::sleep(Duration::from_millis(30));

        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty(), "expired entry is evicted on read");
    }

    #[test]
    fn purge_expired_removes_stale_entries() {
        let cache = ReadCache::new(Duration::from_millis(10));
        cache.set("a", 1);
        cache.set("b", 2);
        std::thread::sleep(Duration::from_millis(30));

        assert_eq!(cache.purge_expired(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn oversized_ttl_is_clamped() {
        let cache = ReadCache::new(Duration::MAX);
        cache.set(keys::IMAGES, 1);
        assert_eq!(cache.get(keys::IMAGES), Some(1));
    }

    #[test]
    fn image_key_format() {
        assert_eq!(keys::image(7), "image_7");
        assert_eq!(keys::IMAGES, "images");
    }
}
