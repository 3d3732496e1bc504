//! Redirect Staging - temporary storage for redirect import files
//!
//! Uploaded redirect files are kept in temporary storage between the
//! upload request and the import confirmation.
//!
//! ## Architecture
//!
//! - `config` - Backend selection, from the environment or settings
//! - `cache` - Process-wide caching with Moka
//! - `storage` - Temporary storage backends (`tmp_file`, `cache`, `memory`)
//! - `staging` - Stage, fetch and discard uploads by name
//! - `error` - Error types

pub mod cache;
pub mod config;
pub mod error;
pub mod staging;
pub mod storage;

pub use config::{StorageBackend, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use staging::UploadStager;
pub use storage::{
    CacheStorage, MemoryStorage, TempFileStorage, TempStorage, open_storage, open_storage_in,
};
