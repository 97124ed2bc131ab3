//! Global search over every enabled source.
//!
//! Wires the user's source preferences into the search aggregator: the
//! enabled-source list is recomputed from preferences on every run, so
//! toggling a language or pinning a source affects the next search.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tsundoku_search::{
    AggregateSearchState, SearchAggregator, SearchConfig, SearchItemResult, SearchRequest,
    SourceEntry, SourceRegistry,
};

use crate::error::Result;
use crate::preferences::SourcePreferences;

pub struct GlobalSearch {
    registry: Arc<SourceRegistry>,
    prefs: SourcePreferences,
    aggregator: SearchAggregator,
    last_query: Mutex<String>,
}

impl GlobalSearch {
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(registry: Arc<SourceRegistry>, prefs: SourcePreferences, config: SearchConfig) -> Result<Self> {
        Ok(Self {
            registry,
            prefs,
            aggregator: SearchAggregator::new(config)?,
            last_query: Mutex::new(String::new()),
        })
    }

    /// Search every enabled source for `query`, replacing any running search.
    ///
    /// Returns the run id.
    pub fn search(&self, query: &str) -> u64 {
        *self.last_query.lock().unwrap_or_else(PoisonError::into_inner) = query.to_owned();
        let filter = self.prefs.source_filter();
        let request = SearchRequest::global(query, &self.registry, &filter);
        self.aggregator.start(request)
    }

    /// Change the pinned-only restriction and rerun the current query.
    ///
    /// # Errors
    ///
    /// Fails only if the preference cannot be stored.
    pub fn set_pinned_only(&self, pinned_only: bool) -> Result<u64> {
        self.prefs.pinned_only().set(&pinned_only)?;
        let query = self.last_query.lock().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(self.search(&query))
    }

    pub fn subscribe(&self) -> watch::Receiver<AggregateSearchState> {
        self.aggregator.subscribe()
    }

    pub fn snapshot(&self) -> AggregateSearchState {
        self.aggregator.snapshot()
    }

    pub fn cancel(&self) {
        self.aggregator.cancel();
    }

    /// # Errors
    ///
    /// Returns an error if the aggregator's state channel closed.
    pub async fn wait_settled(&self) -> Result<AggregateSearchState> {
        Ok(self.aggregator.wait_settled().await?)
    }

    /// Rows to display for `state`, honouring the only-with-results preference.
    pub fn visible_items<'s>(&self, state: &'s AggregateSearchState) -> Vec<&'s (SourceEntry, SearchItemResult)> {
        if self.prefs.only_with_results().get() {
            state.with_results()
        } else {
            state.sorted_items()
        }
    }
}

impl std::fmt::Debug for GlobalSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalSearch")
            .field("registry", &self.registry)
            .field("config", self.aggregator.config())
            .finish_non_exhaustive()
    }
}
