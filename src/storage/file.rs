//! Temporary-directory file storage.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{TempStorage, validate_name};
use crate::config::StorageBackend;
use crate::error::{StorageError, StorageResult};

/// Prefix of generated file names.
const FILE_PREFIX: &str = "redirect-import-";

/// Stores an upload as a file in a temporary directory.
///
/// The file outlives this value: it stays on disk until `remove` is called,
/// so a later request can re-open it by name.
#[derive(Debug, Clone)]
pub struct TempFileStorage {
    name: Option<String>,
    dir: PathBuf,
}

impl TempFileStorage {
    /// Storage in the OS temp dir.
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            name: None,
            dir: dir.into(),
        }
    }

    /// Refer to a file saved earlier under `name`.
    pub fn with_name(mut self, name: impl Into<String>) -> StorageResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        self.name = Some(name);
        Ok(self)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the backing file, once named.
    pub fn path(&self) -> Option<PathBuf> {
        self.name.as_ref().map(|name| self.dir.join(name))
    }

    /// Create a fresh uniquely named file holding `data` and return its name.
    fn create(&self, data: &[u8]) -> StorageResult<String> {
        let mut file = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .tempfile_in(&self.dir)?;
        file.write_all(data)?;

        // Dropping a `NamedTempFile` deletes it; keep it for later requests.
        let (_, path) = file.keep().map_err(|e| e.error)?;

        path.file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| StorageError::InvalidName(path.display().to_string()))
    }
}

impl Default for TempFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TempStorage for TempFileStorage {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::TmpFile
    }

    fn save(&mut self, data: &[u8]) -> StorageResult<()> {
        match self.path() {
            Some(path) => fs::write(&path, data)?,
            None => self.name = Some(self.create(data)?),
        }
        debug!("Saved {} bytes to {:?}", data.len(), self.path());
        Ok(())
    }

    fn read(&self) -> StorageResult<Vec<u8>> {
        let (Some(name), Some(path)) = (self.name.as_deref(), self.path()) else {
            return Err(StorageError::Unnamed);
        };
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::Missing {
                name: name.to_string(),
            },
            _ => StorageError::Io(e),
        })
    }

    fn remove(&mut self) -> StorageResult<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
