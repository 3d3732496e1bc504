//! Configuration for redirect import staging.
//!
//! Loads configuration from environment variables, or from any settings
//! source through `serde`.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::{CacheConfig, DEFAULT_CACHE_ALIAS, MAX_LIFETIME, STAGING_TTL};
use crate::error::{StorageError, StorageResult};

/// Environment variable selecting the storage backend.
pub const ENV_BACKEND: &str = "REDIRECTS_FILE_STORAGE";
pub const ENV_TMP_DIR: &str = "REDIRECTS_TMP_DIR";
pub const ENV_CACHE_ALIAS: &str = "REDIRECTS_CACHE_ALIAS";
pub const ENV_CACHE_TTL_SECS: &str = "REDIRECTS_CACHE_TTL_SECS";
pub const ENV_CACHE_MAX_CAPACITY: &str = "REDIRECTS_CACHE_MAX_CAPACITY";

/// Where staged uploads are kept between requests.
///
/// Parsed the same way from the environment and from settings files.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "String")]
pub enum StorageBackend {
    /// A file in a temporary directory.
    #[default]
    TmpFile,
    /// An entry in a shared cache.
    Cache,
    /// A process-local map.
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TmpFile => "tmp_file",
            Self::Cache => "cache",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tmp_file" => Ok(Self::TmpFile),
            "cache" => Ok(Self::Cache),
            "memory" => Ok(Self::Memory),
            _ => Err(StorageError::UnknownBackend(s.to_string())),
        }
    }
}

impl TryFrom<String> for StorageBackend {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Directory for `tmp_file` storage. `None` means the OS temp dir.
    pub tmp_dir: Option<PathBuf>,

    /// Registry alias of the cache used by `cache` storage.
    pub cache_alias: String,

    /// Lifetime of cached uploads, applied when the cache is first created.
    pub cache_ttl_secs: u64,
    pub cache_max_capacity: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let cache = CacheConfig::default();
        Self {
            backend: StorageBackend::default(),
            tmp_dir: None,
            cache_alias: DEFAULT_CACHE_ALIAS.to_string(),
            cache_ttl_secs: STAGING_TTL.as_secs(),
            cache_max_capacity: cache.max_capacity,
        }
    }
}

impl StorageConfig {
    /// Config with defaults except for the backend.
    pub fn with_backend(backend: StorageBackend) -> Self {
        Self {
            backend,
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> StorageResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> StorageResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(backend) = get(ENV_BACKEND) {
            config.backend = backend.parse()?;
        }

        config.tmp_dir = get(ENV_TMP_DIR).map(PathBuf::from);

        if let Some(alias) = get(ENV_CACHE_ALIAS) {
            config.cache_alias = alias;
        }

        if let Some(ttl) = get(ENV_CACHE_TTL_SECS) {
            config.cache_ttl_secs = parse_u64(ENV_CACHE_TTL_SECS, &ttl)?;
            config.cache_ttl()?;
        }

        if let Some(capacity) = get(ENV_CACHE_MAX_CAPACITY) {
            config.cache_max_capacity = parse_u64(ENV_CACHE_MAX_CAPACITY, &capacity)?;
        }

        Ok(config)
    }

    /// Directory used by `tmp_file` storage.
    pub fn tmp_dir(&self) -> PathBuf {
        self.tmp_dir.clone().unwrap_or_else(env::temp_dir)
    }

    /// Lifetime of cached uploads. `None` when `cache_ttl_secs` is zero.
    pub fn cache_ttl(&self) -> StorageResult<Option<Duration>> {
        let ttl = Duration::from_secs(self.cache_ttl_secs);
        if ttl > MAX_LIFETIME {
            return Err(StorageError::InvalidSetting {
                key: ENV_CACHE_TTL_SECS,
                reason: format!(
                    "{} seconds exceeds the {} second maximum",
                    self.cache_ttl_secs,
                    MAX_LIFETIME.as_secs()
                ),
            });
        }
        Ok((self.cache_ttl_secs > 0).then_some(ttl))
    }

    /// Settings for the cache behind `cache` storage.
    ///
    /// A TTL of zero disables time-based expiry.
    pub fn cache_config(&self) -> StorageResult<CacheConfig> {
        let config = CacheConfig::with_capacity(self.cache_max_capacity);
        Ok(match self.cache_ttl()? {
            Some(ttl) => config.ttl(ttl),
            None => config.no_ttl(),
        })
    }
}

fn parse_u64(key: &'static str, value: &str) -> StorageResult<u64> {
    value.parse().map_err(|e: std::num::ParseIntError| StorageError::InvalidSetting {
        key,
        reason: format!("'{}' is not a non-negative integer ({})", value, e),
    })
}
