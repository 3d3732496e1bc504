//! Moka-backed blob cache.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use super::{CacheConfig, CacheService};

/// Immutable byte blob as held by caches. Cloning only bumps a refcount.
pub type Blob = Arc<[u8]>;

/// A named, bounded cache of blobs keyed by string.
///
/// Clones share the same entries.
#[derive(Clone)]
pub struct BlobCache {
    inner: Cache<String, Blob>,
    name: Arc<str>,
    ttl: Option<Duration>,
}

impl BlobCache {
    /// Create a new cache with the given name and config.
    ///
    /// Lifetimes beyond [`MAX_LIFETIME`](super::MAX_LIFETIME) are capped.
    pub fn new(name: impl Into<Arc<str>>, config: CacheConfig) -> Self {
        let config = config.bounded();
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        Self {
            inner: builder.build(),
            name: name.into(),
            ttl: config.ttl,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// How long entries live after being written, if bounded.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    /// Approximate number of entries; pending maintenance may lag behind.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl CacheService for BlobCache {
    fn get(&self, key: &str) -> Option<Blob> {
        let value = self.inner.get(key);
        match &value {
            Some(_) => debug!("Cache hit for key '{}' in '{}'", key, self.name),
            None => debug!("Cache miss for key '{}' in '{}'", key, self.name),
        }
        value
    }

    fn set(&self, key: &str, value: Blob) {
        debug!("Caching {} bytes under '{}' in '{}'", value.len(), key, self.name);
        self.inner.insert(key.to_owned(), value);
    }

    fn delete(&self, key: &str) -> bool {
        // Removed before returning, whatever the TTL.
        let existed = self.inner.remove(key).is_some();
        debug!("Deleted key '{}' from '{}': {}", key, self.name, existed);
        existed
    }

    fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }
}

impl std::fmt::Debug for BlobCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobCache")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(data: &[u8]) -> Blob {
        Blob::from(data)
    }

    #[test]
    fn test_set_get_delete() {
        let cache = BlobCache::new("blobs", CacheConfig::default());
        cache.set("k", blob(b"value"));
        assert_eq!(cache.get("k").as_deref(), Some(&b"value"[..]));
        assert!(cache.contains("k"));

        assert!(cache.delete("k"));
        assert!(cache.get("k").is_none());
        assert!(!cache.contains("k"));
    }

    #[test]
    fn test_delete_missing_key_reports_false() {
        let cache = BlobCache::new("blobs", CacheConfig::default());
        assert!(!cache.delete("never-set"));
    }

    #[test]
    fn test_set_replaces_value() {
        let cache = BlobCache::new("blobs", CacheConfig::default());
        cache.set("k", blob(b"old"));
        cache.set("k", blob(b"new"));
        assert_eq!(cache.get("k").as_deref(), Some(&b"new"[..]));
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = BlobCache::new("shared", CacheConfig::default().no_ttl());
        let other = cache.clone();

        cache.set("k", blob(b"v"));
        assert!(other.contains("k"));
        assert_eq!(other.name(), "shared");
        assert_eq!(other.ttl(), None);

        other.clear();
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_overlong_ttl_is_capped() {
        let cache = BlobCache::new(
            "forever",
            CacheConfig::default().ttl(Duration::from_secs(u64::MAX)),
        );
        assert_eq!(cache.ttl(), Some(crate::cache::MAX_LIFETIME));

        cache.set("k", blob(b"v"));
        assert!(cache.delete("k"));
        assert!(!cache.contains("k"));
    }
}
