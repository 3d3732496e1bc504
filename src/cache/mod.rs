//! Cache module - process-wide key/value caching using Moka.
//!
//! ## Architecture
//!
//! - `CacheRegistry` - Named caches, with a process-wide `global()` instance
//! - `BlobCache` - Bounded Moka cache of byte blobs
//! - `CacheService` - The get/set/delete interface storage backends depend on
//!
//! ## Usage
//!
//! ```rust
//! use redirect_staging::cache::{CacheRegistry, CacheService};
//!
//! let cache = CacheRegistry::global().default_cache();
//! cache.set("greeting", b"hello".as_slice().into());
//! assert!(cache.contains("greeting"));
//! cache.delete("greeting");
//! ```

mod blob;
mod config;
mod registry;
mod service;

pub use blob::{Blob, BlobCache};
pub use config::{CacheConfig, MAX_LIFETIME, STAGING_TTL};
pub use registry::{CacheRegistry, DEFAULT_CACHE_ALIAS};
pub use service::CacheService;
