//! # tsundoku-search
//!
//! Concurrent multi-source manga search for tsundoku.
//!
//! Given a set of enabled sources and a query, the aggregator runs one search
//! per source concurrently and publishes an [`AggregateSearchState`] that
//! observers can render while slower sources are still loading.
//!
//! ## Design
//!
//! - Sources are trait objects; search and website support are capabilities
//!   looked up through [`Source::as_searchable`] and [`Source::as_web`]
//! - One slot per source: `Loading`, then exactly one of `Success` / `Error`
//! - A failing or panicking source only affects its own slot
//! - Starting a new search cancels the previous run; stale tasks cannot
//!   write into the new run's state
//! - Source lists are ordered by one shared policy ([`ordering`]): pinned
//!   first, then case-insensitive name and language
//!
//! Queries are logged only at trace level.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod ordering;
pub mod registry;
pub mod source;
pub mod state;
pub mod types;

pub use aggregator::{SearchAggregator, SearchRequest};
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use registry::{SourceFilter, SourceRegistry};
pub use source::{HasBaseUrl, Searchable, Source};
pub use state::{AggregateSearchState, RunPhase, SearchItemResult, SourceEntry};
pub use types::{Filter, FilterList, MangaResult, SourceId, TriState};

/// Run a single search to completion and return the settled state.
///
/// Convenience wrapper around [`SearchAggregator`] for callers that do not
/// need incremental progress.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid. Per-source failures
/// are reported inside the returned state, never here.
///
/// # Examples
///
/// ```no_run
/// # async fn example(registry: tsundoku_search::SourceRegistry) -> tsundoku_search::Result<()> {
/// let request = tsundoku_search::SearchRequest::global(
///     "yotsuba",
///     &registry,
///     &tsundoku_search::SourceFilter::default(),
/// );
/// let state = tsundoku_search::search_once(request, &tsundoku_search::SearchConfig::default()).await?;
/// for (source, result) in state.with_results() {
///     println!("{}: {} results", source.name, result.results().map_or(0, <[_]>::len));
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search_once(request: SearchRequest, config: &SearchConfig) -> Result<AggregateSearchState> {
    let aggregator = SearchAggregator::new(config.clone())?;
    aggregator.start(request);
    aggregator.wait_settled().await
}
