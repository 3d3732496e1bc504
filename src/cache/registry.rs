//! Cache registry - Central management for all caches.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::{BlobCache, CacheConfig};

/// Alias of the cache used when nothing else is configured.
pub const DEFAULT_CACHE_ALIAS: &str = "default";

static GLOBAL: Lazy<CacheRegistry> = Lazy::new(CacheRegistry::new);

/// Central registry of named blob caches.
///
/// Each alias maps to one cache shared by everything that asks for it,
/// so data written through one handle is visible through every other.
///
/// ## Example
///
/// ```rust
/// use redirect_staging::cache::{CacheConfig, CacheRegistry, CacheService};
///
/// let registry = CacheRegistry::new();
/// let uploads = registry.get_or_create("uploads", CacheConfig::default());
/// uploads.set("key", b"bytes".as_slice().into());
///
/// let again = registry.get("uploads").unwrap();
/// assert!(again.contains("key"));
/// ```
#[derive(Clone)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, BlobCache>>>,
}

impl CacheRegistry {
    /// Create a new empty cache registry.
    pub fn new() -> Self {
        info!("Cache registry initialized");
        Self {
            caches: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static CacheRegistry {
        &GLOBAL
    }

    /// Get an existing cache by alias.
    pub fn get(&self, alias: &str) -> Option<BlobCache> {
        self.caches.read().get(alias).cloned()
    }

    /// Get an existing cache or create a new one if it doesn't exist.
    ///
    /// `config` only applies when the cache is created.
    pub fn get_or_create(&self, alias: &str, config: CacheConfig) -> BlobCache {
        if let Some(cache) = self.get(alias) {
            return cache;
        }

        let mut caches = self.caches.write();
        // Another thread may have created it between the two locks.
        caches
            .entry(alias.to_string())
            .or_insert_with(|| {
                debug!("Creating cache: {} ({:?})", alias, config);
                BlobCache::new(alias, config)
            })
            .clone()
    }

    /// The cache registered under [`DEFAULT_CACHE_ALIAS`].
    pub fn default_cache(&self) -> BlobCache {
        self.get_or_create(DEFAULT_CACHE_ALIAS, CacheConfig::default())
    }

    /// Check if a cache with the given alias exists.
    pub fn contains(&self, alias: &str) -> bool {
        self.caches.read().contains_key(alias)
    }

    /// Remove a cache from the registry.
    ///
    /// Returns `true` if the cache was removed. Handles already given out
    /// keep working but are no longer shared with new callers.
    pub fn remove(&self, alias: &str) -> bool {
        let removed = self.caches.write().remove(alias).is_some();
        if removed {
            debug!("Removed cache: {}", alias);
        }
        removed
    }

    /// Get the number of registered caches.
    pub fn len(&self) -> usize {
        self.caches.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.caches.read().is_empty()
    }

    /// Get a list of all registered cache aliases.
    pub fn cache_names(&self) -> Vec<String> {
        self.caches.read().keys().cloned().collect()
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &caches.len())
            .field("cache_names", &caches.keys().collect::<Vec<_>>())
            .finish()
    }
}
