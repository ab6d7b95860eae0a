//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, JourneyCache};
use crate::planner::SearchConfig;
use crate::snapshot::NetworkStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Current network snapshot
    pub store: NetworkStore,

    /// Cached route query results
    pub cache: JourneyCache,

    /// Route engine configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: NetworkStore, cache_config: &CacheConfig, config: SearchConfig) -> Self {
        Self {
            store,
            cache: JourneyCache::new(cache_config),
            config: Arc::new(config),
        }
    }
}
