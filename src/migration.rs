//! Migration search: find a library manga on other sources.
//!
//! Runs the shared aggregator over the user's migration source list. The
//! manga's current source is searched and listed first so the user can
//! compare against what they already have.

use std::sync::Arc;

use tokio::sync::watch;
use tsundoku_search::ordering::sort_sources_preferring;
use tsundoku_search::{AggregateSearchState, SearchAggregator, SearchConfig, SearchRequest, Source, SourceRegistry};

use crate::error::Result;
use crate::manga::Manga;
use crate::preferences::SourcePreferences;

pub struct MigrationSearch {
    registry: Arc<SourceRegistry>,
    prefs: SourcePreferences,
    aggregator: SearchAggregator,
}

impl MigrationSearch {
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(registry: Arc<SourceRegistry>, prefs: SourcePreferences, config: SearchConfig) -> Result<Self> {
        Ok(Self {
            registry,
            prefs,
            aggregator: SearchAggregator::new(config)?,
        })
    }

    /// Sources a migration of `manga` searches, in dispatch order.
    ///
    /// The configured migration list is used when set, otherwise every
    /// enabled source. Hidden sources are never searched and the
    /// pinned-only preference is honoured. The current source, when
    /// searchable, leads.
    pub fn sources_for(&self, manga: &Manga) -> Vec<Arc<dyn Source>> {
        let filter = self.prefs.source_filter();
        let configured = self.prefs.migration_sources().get();

        let mut sources: Vec<Arc<dyn Source>> = if configured.is_empty() {
            self.registry.enabled_sources(&filter)
        } else {
            self.registry
                .subset(&configured)
                .into_iter()
                .filter(|s| !filter.hidden.contains(&s.id()))
                .filter(|s| !filter.pinned_only || filter.pinned.contains(&s.id()))
                .collect()
        };

        if !sources.iter().any(|s| s.id() == manga.source_id) {
            if let Some(current) = self
                .registry
                .get(manga.source_id)
                .filter(|s| s.as_searchable().is_some())
            {
                sources.push(current);
            }
        }
        sort_sources_preferring(&mut sources, &filter.pinned, manga.source_id);
        sources
    }

    /// Search for `manga`. `query` defaults to the manga's title.
    ///
    /// Returns the run id.
    pub fn search(&self, manga: &Manga, query: Option<&str>) -> u64 {
        let query = query.unwrap_or(&manga.title);
        let request =
            SearchRequest::new(query, self.sources_for(manga)).with_pinned(self.prefs.pinned_sources().get());
        tracing::debug!(manga_id = manga.id, source_id = manga.source_id, "starting migration search");
        self.aggregator.start(request)
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
}

impl std::fmt::Debug for MigrationSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationSearch")
            .field("registry", &self.registry)
            .field("config", self.aggregator.config())
            .finish_non_exhaustive()
    }
}
