//! Concurrent multi-source search: fan-out, per-source settle, cancellation.
//!
//! # Pipeline
//!
//! 1. [`SearchAggregator::start`] cancels the previous run, then publishes a
//!    fresh [`AggregateSearchState`] with every source `Loading`.
//! 2. A coordinator task spawns one task per source into a [`JoinSet`];
//!    a semaphore bounds how many of them query their source at once.
//! 3. Each task settles its own slot through the watch channel as soon as
//!    its source answers. Source errors and panics become
//!    [`SearchItemResult::Error`] for that slot only.
//! 4. Every write checks the run id, so a task that outlives its run can
//!    never touch a newer run's state.

use std::any::Any;
use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use tokio::sync::{watch, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::registry::{SourceFilter, SourceRegistry};
use crate::source::{HasBaseUrl, Source};
use crate::state::{AggregateSearchState, SearchItemResult, SourceEntry};
use crate::types::{FilterList, MangaResult, SourceId};

/// What to search and where.
#[derive(Clone)]
pub struct SearchRequest {
    /// The query text. Blank queries reset the aggregator to idle.
    pub query: String,
    /// Sources in dispatch order.
    pub sources: Vec<Arc<dyn Source>>,
    /// Pinned source ids, used for display ordering.
    pub pinned: BTreeSet<SourceId>,
    /// Filters passed to every source; `None` uses each source's defaults.
    pub filters: Option<FilterList>,
}

impl SearchRequest {
    /// Search `sources` in the given order.
    pub fn new(query: impl Into<String>, sources: Vec<Arc<dyn Source>>) -> Self {
        Self {
            query: query.into(),
            sources,
            pinned: BTreeSet::new(),
            filters: None,
        }
    }

    /// Search every source `filter` enables, pinned first.
    pub fn global(query: impl Into<String>, registry: &SourceRegistry, filter: &SourceFilter) -> Self {
        Self {
            pinned: filter.pinned.clone(),
            ..Self::new(query, registry.enabled_sources(filter))
        }
    }

    pub fn with_pinned(mut self, pinned: BTreeSet<SourceId>) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn with_filters(mut self, filters: FilterList) -> Self {
        self.filters = Some(filters);
        self
    }
}

impl std::fmt::Debug for SearchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchRequest")
            .field("sources", &self.sources.iter().map(|s| s.id()).collect::<Vec<_>>())
            .field("pinned", &self.pinned)
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

struct ActiveRun {
    run_id: u64,
    cancel: CancellationToken,
    coordinator: JoinHandle<()>,
}

/// Runs one search per source concurrently and publishes incremental state.
///
/// Only one run is active at a time: starting a run cancels the previous one
/// before the new state is published. Must be used inside a tokio runtime.
pub struct SearchAggregator {
    config: SearchConfig,
    state: Arc<watch::Sender<AggregateSearchState>>,
    active: Mutex<Option<ActiveRun>>,
    next_run_id: AtomicU64,
}

impl SearchAggregator {
    /// Create an idle aggregator.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let (state, _) = watch::channel(AggregateSearchState::idle(0));
        Ok(Self {
            config,
            state: Arc::new(state),
            active: Mutex::new(None),
            next_run_id: AtomicU64::new(1),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Observe state changes. The receiver always sees the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<AggregateSearchState> {
        self.state.subscribe()
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> AggregateSearchState {
        self.state.borrow().clone()
    }

    /// Start a new run, replacing (and cancelling) the current one.
    ///
    /// Returns the new run id.
    pub fn start(&self, request: SearchRequest) -> u64 {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = active.take() {
            previous.cancel.cancel();
            previous.coordinator.abort();
            tracing::debug!(run_id = previous.run_id, "cancelled previous search run");
        }

        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        let query = request.query.trim().to_owned();
        if query.is_empty() {
            self.state.send_replace(AggregateSearchState::idle(run_id));
            return run_id;
        }

        let SearchRequest {
            sources,
            pinned,
            filters,
            ..
        } = request;
        // One slot and one query per source id; the first occurrence keeps its position.
        let mut seen = BTreeSet::new();
        let sources: Vec<Arc<dyn Source>> = sources
            .into_iter()
            .filter(|s| seen.insert(s.id()))
            .collect();

        let entries: Vec<SourceEntry> = sources
            .iter()
            .map(|s| SourceEntry {
                id: s.id(),
                name: s.name().to_owned(),
                lang: s.lang().to_owned(),
                pinned: pinned.contains(&s.id()),
            })
            .collect();
        tracing::info!(run_id, sources = entries.len(), "starting search run");
        tracing::trace!(run_id, %query, "search query");
        self.state
            .send_replace(AggregateSearchState::dispatching(run_id, query.clone(), entries));

        let cancel = CancellationToken::new();
        let ctx = Arc::new(RunContext {
            run_id,
            query,
            filters,
            dedupe: self.config.dedupe_results,
            cancel: cancel.clone(),
            state: Arc::clone(&self.state),
        });
        let coordinator = tokio::spawn(coordinate(ctx, sources, self.config.max_concurrent_sources));

        *active = Some(ActiveRun {
            run_id,
            cancel,
            coordinator,
        });
        run_id
    }

    /// Cancel the current run and reset to an idle state.
    pub fn cancel(&self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = active.take() {
            previous.cancel.cancel();
            previous.coordinator.abort();
            let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
            self.state.send_replace(AggregateSearchState::idle(run_id));
            tracing::debug!(run_id = previous.run_id, "search run cancelled");
        }
    }

    /// Wait until the current state is terminal (settled or idle).
    ///
    /// If a newer run replaces the current one while waiting, this waits for
    /// that newer run instead.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Cancelled`] if the state channel closed.
    pub async fn wait_settled(&self) -> Result<AggregateSearchState> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|s| s.phase().is_terminal())
            .await
            .map_err(|_| SearchError::Cancelled)?;
        Ok(state.clone())
    }
}

impl Drop for SearchAggregator {
    fn drop(&mut self) {
        let active = self.active.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(run) = active.take() {
            run.cancel.cancel();
            run.coordinator.abort();
        }
    }
}

/// Everything a per-source task needs, shared by all tasks of one run.
struct RunContext {
    run_id: u64,
    query: String,
    filters: Option<FilterList>,
    dedupe: bool,
    cancel: CancellationToken,
    state: Arc<watch::Sender<AggregateSearchState>>,
}

impl RunContext {
    /// Apply one slot update atomically, unless the run was replaced.
    fn settle(&self, source_id: SourceId, result: SearchItemResult) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.state.send_if_modified(|state| {
            state.run_id() == self.run_id && state.settle(source_id, result)
        })
    }

    fn mark_running(&self) {
        self.state
            .send_if_modified(|state| state.run_id() == self.run_id && state.mark_running());
    }
}

async fn coordinate(ctx: Arc<RunContext>, sources: Vec<Arc<dyn Source>>, limit: usize) {
    let permits = Arc::new(Semaphore::new(limit));
    let mut tasks = JoinSet::new();
    for source in sources {
        tasks.spawn(search_task(Arc::clone(&ctx), source, Arc::clone(&permits)));
    }
    ctx.mark_running();

    loop {
        tokio::select! {
            _ = ctx.cancel.cancelled() => {
                tasks.abort_all();
                tracing::debug!(run_id = ctx.run_id, "search run aborted");
                break;
            }
            joined = tasks.join_next() => match joined {
                None => break,
                Some(Err(err)) if !err.is_cancelled() => {
                    tracing::warn!(run_id = ctx.run_id, error = %err, "search task failed to join");
                }
                Some(_) => {}
            },
        }
    }
    tracing::info!(run_id = ctx.run_id, "search run finished");
}

async fn search_task(ctx: Arc<RunContext>, source: Arc<dyn Source>, permits: Arc<Semaphore>) {
    let Ok(_permit) = permits.acquire_owned().await else {
        return;
    };
    if ctx.cancel.is_cancelled() {
        return;
    }

    let source_id = source.id();
    let outcome = AssertUnwindSafe(query_source(source.as_ref(), &ctx.query, ctx.filters.as_ref()))
        .catch_unwind()
        .await;
    let result = match outcome {
        Ok(Ok(results)) => {
            let mut results = if ctx.dedupe {
                dedupe_by_url(results)
            } else {
                results
            };
            if let Some(web) = source.as_web() {
                resolve_links(web, &mut results);
            }
            tracing::debug!(source_id, count = results.len(), "source returned results");
            SearchItemResult::Success(results)
        }
        Ok(Err(err)) => {
            tracing::warn!(source_id, error = %err, "source search failed");
            SearchItemResult::Error(err)
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::warn!(source_id, panic = %message, "source search panicked");
            SearchItemResult::Error(SearchError::Panicked(message))
        }
    };

    if !ctx.settle(source_id, result) {
        tracing::debug!(source_id, run_id = ctx.run_id, "dropped stale search result");
    }
}

/// Query a single source through its search capability.
async fn query_source(
    source: &dyn Source,
    query: &str,
    filters: Option<&FilterList>,
) -> Result<Vec<MangaResult>> {
    let Some(searchable) = source.as_searchable() else {
        return Err(SearchError::NotSearchable(source.display_name()));
    };
    match filters {
        Some(filters) => searchable.search(query, filters).await,
        None => searchable.search(query, &searchable.default_filters()).await,
    }
}

/// Fill in absolute links the source did not already provide.
fn resolve_links(web: &dyn HasBaseUrl, results: &mut [MangaResult]) {
    for result in results.iter_mut().filter(|r| r.link.is_none()) {
        match web.absolute_url(&result.url) {
            Ok(link) => result.link = Some(link),
            Err(err) => {
                tracing::debug!(
                    source_id = result.source_id,
                    url = %result.url,
                    error = %err,
                    "unresolvable result url"
                );
            }
        }
    }
}

/// Keep the first result for each URL, preserving source order.
fn dedupe_by_url(results: Vec<MangaResult>) -> Vec<MangaResult> {
    let mut seen = std::collections::HashSet::new();
    results
        .into_iter()
        .filter(|r| seen.insert(r.url.clone()))
        .collect()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}
