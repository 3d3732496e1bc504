//! Cache configuration.

use std::time::Duration;

/// Lifetime of staged uploads: one day.
pub const STAGING_TTL: Duration = Duration::from_secs(86_400);

/// Longest TTL or TTI a cache accepts (1000 years); Moka refuses anything longer.
pub const MAX_LIFETIME: Duration = Duration::from_secs(1000 * 365 * 24 * 3600);

/// Configuration for a cache instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for cache entries.
    /// After this duration, entries are automatically evicted.
    pub ttl: Option<Duration>,

    /// Time-to-idle for cache entries.
    /// Entries are evicted if not accessed within this duration.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            ttl: Some(STAGING_TTL),
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with the given max capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Disable TTL (entries never expire based on time).
    #[must_use]
    pub fn no_ttl(mut self) -> Self {
        self.ttl = None;
        self
    }

    /// Same config with TTL and TTI capped at [`MAX_LIFETIME`].
    #[must_use]
    pub fn bounded(self) -> Self {
        let cap = |d: Option<Duration>| d.map(|d| d.min(MAX_LIFETIME));
        Self {
            ttl: cap(self.ttl),
            tti: cap(self.tti),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keeps_entries_for_a_day() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Some(STAGING_TTL));
        assert_eq!(config.tti, None);
    }

    #[test]
    fn test_builder_overrides() {
        let config = CacheConfig::with_capacity(10).no_ttl();
        assert_eq!(config.max_capacity, 10);
        assert_eq!(config.ttl, None);

        let config = config.ttl(Duration::from_secs(5));
        assert_eq!(config.ttl, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_bounded_caps_lifetimes() {
        let config = CacheConfig {
            tti: Some(Duration::MAX),
            ..CacheConfig::default().ttl(MAX_LIFETIME + Duration::from_secs(1))
        }
        .bounded();

        assert_eq!(config.ttl, Some(MAX_LIFETIME));
        assert_eq!(config.tti, Some(MAX_LIFETIME));
        assert_eq!(CacheConfig::default().bounded(), CacheConfig::default());
    }
}
