//! Search configuration for the route engine.

use std::time::Duration;

/// Configuration parameters for route search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Wall-clock budget for one query (milliseconds).
    /// Queries running longer fail with a timeout. `None` means no limit.
    pub time_budget_ms: Option<u64>,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(time_budget_ms: Option<u64>) -> Self {
        Self { time_budget_ms }
    }

    /// A configuration with no time limit.
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Returns the time budget as a Duration.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: Some(2_000),
        }
    }
}
