//! In-process memory storage.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use super::{TempStorage, generate_name, validate_name};
use crate::cache::Blob;
use crate::config::StorageBackend;
use crate::error::{StorageError, StorageResult};

/// Map of storage name to staged data.
pub type MemoryStore = Arc<DashMap<String, Blob>>;

static PROCESS_STORE: Lazy<MemoryStore> = Lazy::new(|| Arc::new(DashMap::new()));

/// Keeps uploads in a process-wide map.
///
/// Nothing expires on its own; entries live until `remove` or process exit.
/// Only suitable when every request is served by the same process.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    name: Option<String>,
    store: MemoryStore,
}

impl MemoryStorage {
    /// Storage over the process-wide store.
    pub fn new() -> Self {
        Self::with_store(Arc::clone(&PROCESS_STORE))
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self { name: None, store }
    }

    /// Refer to data saved earlier under `name`.
    pub fn with_name(mut self, name: impl Into<String>) -> StorageResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        self.name = Some(name);
        Ok(self)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TempStorage for MemoryStorage {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Memory
    }

    fn save(&mut self, data: &[u8]) -> StorageResult<()> {
        let name = self.name.get_or_insert_with(generate_name).clone();
        debug!("Saved {} bytes to memory as '{}'", data.len(), name);
        self.store.insert(name, Blob::from(data));
        Ok(())
    }

    fn read(&self) -> StorageResult<Vec<u8>> {
        let name = self.name.as_deref().ok_or(StorageError::Unnamed)?;
        self.store
            .get(name)
            .map(|entry| entry.value().to_vec())
            .ok_or_else(|| StorageError::Missing {
                name: name.to_string(),
            })
    }

    fn remove(&mut self) -> StorageResult<()> {
        if let Some(name) = &self.name {
            self.store.remove(name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated() -> MemoryStorage {
        MemoryStorage::with_store(MemoryStore::default())
    }

    #[test]
    fn test_save_read_remove() {
        let mut storage = isolated();
        storage.save(b"test data").unwrap();
        assert_eq!(storage.read().unwrap(), b"test data");

        storage.remove().unwrap();
        assert!(matches!(storage.read(), Err(StorageError::Missing { .. })));
        storage.remove().unwrap();
    }

    #[test]
    fn test_clones_share_store() {
        let store = MemoryStore::default();
        let mut writer = MemoryStorage::with_store(Arc::clone(&store));
        writer.save(b"shared").unwrap();

        let reader = MemoryStorage::with_store(store)
            .with_name(writer.name().unwrap())
            .unwrap();
        assert_eq!(reader.read().unwrap(), b"shared");
    }

    #[test]
    fn test_process_store_is_shared() {
        let mut writer = MemoryStorage::new();
        writer.save(b"global").unwrap();

        let mut reader = MemoryStorage::new().with_name(writer.name().unwrap()).unwrap();
        assert_eq!(reader.read().unwrap(), b"global");
        reader.remove().unwrap();
        assert!(writer.read().is_err());
    }
}
