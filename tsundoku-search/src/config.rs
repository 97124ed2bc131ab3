//! Aggregator configuration with sensible defaults.

use crate::error::SearchError;

/// Configuration for a [`crate::SearchAggregator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of per-source searches in flight at once. Sources
    /// waiting for a slot stay `Loading`.
    pub max_concurrent_sources: usize,
    /// Drop repeated URLs within one source's result list (first one wins).
    pub dedupe_results: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sources: 5,
            dedupe_results: true,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `max_concurrent_sources` is 0.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_concurrent_sources == 0 {
            return Err(SearchError::Config(
                "max_concurrent_sources must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
