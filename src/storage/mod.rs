//! Temporary storage for uploaded redirect files.
//!
//! An upload is saved on one request and read back on a later one, so each
//! storage is identified by a `name` that can be handed to the client and
//! used to re-open the same data.
//!
//! ## Backends
//!
//! - `TempFileStorage` - a file in a temporary directory
//! - `CacheStorage` - an entry in a shared cache under `CACHE_PREFIX + name`
//! - `MemoryStorage` - a process-local map

mod cache;
mod file;
mod memory;

use std::fmt;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::CacheRegistry;
use crate::config::{StorageBackend, StorageConfig};
use crate::error::{StorageError, StorageResult};

pub use cache::CacheStorage;
pub use file::TempFileStorage;
pub use memory::{MemoryStorage, MemoryStore};

/// Common interface of all temporary storage backends.
pub trait TempStorage: fmt::Debug + Send {
    /// The storage name, once generated or given.
    fn name(&self) -> Option<&str>;

    fn backend(&self) -> StorageBackend;

    /// Write `data`, generating a name first if there is none.
    fn save(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Read back the stored data.
    fn read(&self) -> StorageResult<Vec<u8>>;

    /// Read back the stored data as UTF-8 text.
    fn read_to_string(&self) -> StorageResult<String> {
        Ok(String::from_utf8(self.read()?)?)
    }

    /// Delete the stored data. Removing data that is already gone is a no-op.
    ///
    /// The name is kept so the caller can still refer to it.
    fn remove(&mut self) -> StorageResult<()>;
}

/// Generate a fresh storage name: 32 lowercase hex characters.
pub fn generate_name() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Check that `name` is a plain token.
///
/// Names reach us from clients, and end up both in cache keys and in file
/// paths, so separators and relative components are refused.
pub fn validate_name(name: &str) -> StorageResult<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);

    if valid {
        Ok(())
    } else {
        warn!("Rejected storage name {:?}", name);
        Err(StorageError::InvalidName(name.to_string()))
    }
}

/// Open storage for the configured backend using the process-wide cache registry.
///
/// With `name` set, the storage refers to previously saved data.
pub fn open_storage(
    config: &StorageConfig,
    name: Option<&str>,
) -> StorageResult<Box<dyn TempStorage>> {
    open_storage_in(config, CacheRegistry::global(), name)
}

/// Open storage for the configured backend, taking caches from `registry`.
pub fn open_storage_in(
    config: &StorageConfig,
    registry: &CacheRegistry,
    name: Option<&str>,
) -> StorageResult<Box<dyn TempStorage>> {
    debug!("Opening {} storage (name: {:?})", config.backend, name);

    let storage: Box<dyn TempStorage> = match config.backend {
        StorageBackend::TmpFile => {
            let storage = TempFileStorage::in_dir(config.tmp_dir());
            match name {
                Some(name) => Box::new(storage.with_name(name)?),
                None => Box::new(storage),
            }
        }
        StorageBackend::Cache => {
            let cache = registry.get_or_create(&config.cache_alias, config.cache_config()?);
            let storage = CacheStorage::with_cache(cache);
            match name {
                Some(name) => Box::new(storage.with_name(name)?),
                None => Box::new(storage),
            }
        }
        StorageBackend::Memory => {
            let storage = MemoryStorage::new();
            match name {
                Some(name) => Box::new(storage.with_name(name)?),
                None => Box::new(storage),
            }
        }
    };

    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheService;

    #[test]
    fn test_generated_names_are_unique_hex() {
        let a = generate_name();
        let b = generate_name();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(validate_name(&a).is_ok());
    }

    #[test]
    fn test_validate_name_rejects_paths() {
        for name in ["", ".", "..", "../etc/passwd", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(validate_name(name), Err(StorageError::InvalidName(_))),
                "{:?} should be rejected",
                name
            );
        }
        assert!(validate_name("redirect-import-abc123.csv").is_ok());
    }

    #[test]
    fn test_open_storage_selects_backend() {
        let registry = CacheRegistry::new();
        for backend in [StorageBackend::TmpFile, StorageBackend::Cache, StorageBackend::Memory] {
            let config = StorageConfig::with_backend(backend);
            let storage = open_storage_in(&config, &registry, None).unwrap();
            assert_eq!(storage.backend(), backend);
            assert!(storage.name().is_none());
        }
    }

    #[test]
    fn test_cache_backend_uses_configured_alias() {
        let registry = CacheRegistry::new();
        let config = StorageConfig {
            cache_alias: "imports".to_string(),
            ..StorageConfig::with_backend(StorageBackend::Cache)
        };

        let mut storage = open_storage_in(&config, &registry, None).unwrap();
        storage.save(b"from,to\n/a,/b\n").unwrap();

        let cache = registry.get("imports").expect("cache created on open");
        let key = format!("{}{}", CacheStorage::CACHE_PREFIX, storage.name().unwrap());
        assert_eq!(cache.get(&key).as_deref(), Some(&b"from,to\n/a,/b\n"[..]));
    }

    #[test]
    fn test_open_storage_rejects_invalid_name() {
        let registry = CacheRegistry::new();
        let config = StorageConfig::with_backend(StorageBackend::Memory);
        assert!(matches!(
            open_storage_in(&config, &registry, Some("../x")),
            Err(StorageError::InvalidName(_))
        ));
    }
}
