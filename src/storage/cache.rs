//! Cache-backed temporary storage.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{TempStorage, generate_name, validate_name};
use crate::cache::{Blob, CacheRegistry, CacheService};
use crate::config::StorageBackend;
use crate::error::{StorageError, StorageResult};

/// Stores an upload as a single cache entry under `CACHE_PREFIX + name`.
///
/// Entries expire with the cache's TTL, but `remove` deletes the entry
/// explicitly so nothing stale is left readable in the meantime.
pub struct CacheStorage {
    /// Generated on the first save unless given up front.
    pub name: Option<String>,
    cache: Arc<dyn CacheService>,
}

impl CacheStorage {
    /// Prefix namespacing every key this storage writes.
    pub const CACHE_PREFIX: &'static str = "redirect-import-";

    /// Storage over the process-wide default cache.
    pub fn new() -> Self {
        Self::with_cache(CacheRegistry::global().default_cache())
    }

    /// Storage over the given cache service.
    pub fn with_cache(cache: impl CacheService + 'static) -> Self {
        Self::with_shared_cache(Arc::new(cache))
    }

    pub fn with_shared_cache(cache: Arc<dyn CacheService>) -> Self {
        Self { name: None, cache }
    }

    /// Refer to data saved earlier under `name`.
    pub fn with_name(mut self, name: impl Into<String>) -> StorageResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        self.name = Some(name);
        Ok(self)
    }

    /// The cache key for `name`.
    pub fn key_for(name: &str) -> String {
        format!("{}{}", Self::CACHE_PREFIX, name)
    }

    /// The cache key this storage reads and writes, once it has a name.
    pub fn cache_key(&self) -> Option<String> {
        self.name.as_deref().map(Self::key_for)
    }
}

impl Default for CacheStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TempStorage for CacheStorage {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Cache
    }

    fn save(&mut self, data: &[u8]) -> StorageResult<()> {
        let name = self.name.get_or_insert_with(generate_name);
        let key = Self::key_for(name);
        self.cache.set(&key, Blob::from(data));
        debug!("Saved {} bytes to cache key '{}'", data.len(), key);
        Ok(())
    }

    fn read(&self) -> StorageResult<Vec<u8>> {
        let name = self.name.as_deref().ok_or(StorageError::Unnamed)?;
        self.cache
            .get(&Self::key_for(name))
            .map(|blob| blob.to_vec())
            .ok_or_else(|| StorageError::Missing {
                name: name.to_string(),
            })
    }

    fn remove(&mut self) -> StorageResult<()> {
        let Some(key) = self.cache_key() else {
            return Ok(());
        };
        if !self.cache.delete(&key) {
            debug!("Cache key '{}' was already gone", key);
        }
        Ok(())
    }
}

impl fmt::Debug for CacheStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStorage")
            .field("name", &self.name)
            .field("prefix", &Self::CACHE_PREFIX)
            .finish()
    }
}
