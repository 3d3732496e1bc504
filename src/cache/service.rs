//! Key/value cache interface used by cache-backed storage.

use super::Blob;

/// Minimal key/value cache interface.
///
/// Implementations must make `delete` visible immediately: a `get` issued
/// after `delete` returns `None` regardless of any expiry settings.
pub trait CacheService: Send + Sync {
    /// Look up a key. `None` if absent or expired.
    fn get(&self, key: &str) -> Option<Blob>;

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: Blob);

    /// Delete a key. Returns `true` if an entry existed.
    fn delete(&self, key: &str) -> bool;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
