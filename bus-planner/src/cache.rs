//! Caching layer for route query results.
//!
//! Results depend only on the snapshot and the query, so they are keyed by
//! the snapshot generation. After a refresh, lookups use the new
//! generation and never see results computed on the old network; those
//! age out through the TTL.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Calendar, ClockTime, Stop};
use crate::planner::{Mode, SearchResult};

/// Cache key for a route query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JourneyKey {
    /// Snapshot generation the result was computed on
    pub generation: u64,
    pub calendar: Calendar,
    pub origin: Stop,
    pub destination: Stop,
    pub start: ClockTime,
    pub mode: Mode,
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Cache of route query results.
#[derive(Clone)]
pub struct JourneyCache {
    results: MokaCache<JourneyKey, Arc<SearchResult>>,
}

impl JourneyCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let results = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { results }
    }

    /// Get a cached result.
    pub async fn get(&self, key: &JourneyKey) -> Option<Arc<SearchResult>> {
        self.results.get(key).await
    }

    /// Insert a result into the cache.
    pub async fn insert(&self, key: JourneyKey, result: Arc<SearchResult>) {
        self.results.insert(key, result).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.results.entry_count()
    }
}
