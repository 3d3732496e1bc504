//! Staging of uploaded redirect import files.
//!
//! The import flow spans requests: the upload is staged and its name sent
//! back to the client, the confirmation request fetches it by that name,
//! and once the import has run the staged copy is discarded.

use tracing::info;

use crate::cache::CacheRegistry;
use crate::config::StorageConfig;
use crate::error::StorageResult;
use crate::storage::{TempStorage, open_storage_in};

/// Stages uploads in the configured temporary storage.
#[derive(Debug, Clone)]
pub struct UploadStager {
    config: StorageConfig,
    registry: CacheRegistry,
}

impl UploadStager {
    /// Stager over the process-wide cache registry.
    pub fn new(config: StorageConfig) -> Self {
        Self::with_registry(config, CacheRegistry::global().clone())
    }

    pub fn with_registry(config: StorageConfig, registry: CacheRegistry) -> Self {
        Self { config, registry }
    }

    /// Load configuration from the environment.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self::new(StorageConfig::from_env()?))
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn open(&self, name: Option<&str>) -> StorageResult<Box<dyn TempStorage>> {
        open_storage_in(&self.config, &self.registry, name)
    }

    /// Save an upload and return the name to fetch it by.
    pub fn stage(&self, data: &[u8]) -> StorageResult<String> {
        let mut storage = self.open(None)?;
        storage.save(data)?;

        let name = storage.name().unwrap_or_default().to_string();
        info!(
            "Staged {} byte upload as '{}' ({})",
            data.len(),
            name,
            self.config.backend
        );
        Ok(name)
    }

    /// Read a staged upload.
    pub fn fetch(&self, name: &str) -> StorageResult<Vec<u8>> {
        self.open(Some(name))?.read()
    }

    /// Read a staged upload as UTF-8 text.
    pub fn fetch_text(&self, name: &str) -> StorageResult<String> {
        self.open(Some(name))?.read_to_string()
    }

    /// Drop a staged upload. Discarding twice is fine.
    pub fn discard(&self, name: &str) -> StorageResult<()> {
        self.open(Some(name))?.remove()?;
        info!("Discarded staged upload '{}'", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use crate::error::StorageError;

    #[test]
    fn test_stage_fetch_discard_in_memory() {
        let stager = UploadStager::with_registry(
            StorageConfig::with_backend(StorageBackend::Memory),
            CacheRegistry::new(),
        );

        let name = stager.stage(b"from,to\n/a,/b\n").unwrap();
        assert_eq!(stager.fetch_text(&name).unwrap(), "from,to\n/a,/b\n");

        stager.discard(&name).unwrap();
        assert!(matches!(stager.fetch(&name), Err(StorageError::Missing { .. })));
        stager.discard(&name).unwrap();
    }

    #[test]
    fn test_each_stage_gets_its_own_name() {
        let stager = UploadStager::with_registry(
            StorageConfig::with_backend(StorageBackend::Cache),
            CacheRegistry::new(),
        );

        let first = stager.stage(b"one").unwrap();
        let second = stager.stage(b"two").unwrap();
        assert_ne!(first, second);
        assert_eq!(stager.fetch(&first).unwrap(), b"one");
        assert_eq!(stager.fetch(&second).unwrap(), b"two");
    }
}
