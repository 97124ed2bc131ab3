//! Observer-visible state of a search run.
//!
//! Each run owns one [`AggregateSearchState`]: an insertion-ordered list of
//! `(source, result)` slots, one per dispatched source. A slot starts as
//! [`SearchItemResult::Loading`] and settles exactly once.

use crate::error::SearchError;
use crate::ordering::{compare_sources, SourceKey};
use crate::types::{MangaResult, SourceId};

/// Outcome of one source's search within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchItemResult {
    Loading,
    Success(Vec<MangaResult>),
    Error(SearchError),
}

impl SearchItemResult {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    /// The results of a successful search, empty or not.
    pub fn results(&self) -> Option<&[MangaResult]> {
        match self {
            Self::Success(results) => Some(results),
            _ => None,
        }
    }

    /// Success with at least one result.
    pub fn has_results(&self) -> bool {
        self.results().is_some_and(|r| !r.is_empty())
    }

    pub fn error(&self) -> Option<&SearchError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Lifecycle of a run: `Idle -> Dispatching -> Running -> Settled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Dispatching,
    Running,
    Settled,
}

impl RunPhase {
    /// No task of the run can still write (`Idle` or `Settled`).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Idle | Self::Settled)
    }
}

/// Identity of a dispatched source, captured when the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub id: SourceId,
    pub name: String,
    pub lang: String,
    pub pinned: bool,
}

impl SourceEntry {
    pub fn key(&self) -> SourceKey<'_> {
        SourceKey {
            id: self.id,
            name: &self.name,
            lang: &self.lang,
            pinned: self.pinned,
        }
    }
}

/// Aggregate state of one search run.
///
/// `progress()` never decreases within a run and `total()` is fixed once
/// dispatch is done; a new run replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSearchState {
    run_id: u64,
    query: String,
    phase: RunPhase,
    items: Vec<(SourceEntry, SearchItemResult)>,
}

impl AggregateSearchState {
    /// An empty state for `run_id` with nothing dispatched.
    pub fn idle(run_id: u64) -> Self {
        Self {
            run_id,
            ..Self::default()
        }
    }

    /// A freshly dispatched run: every entry `Loading`, in `entries` order.
    ///
    /// Duplicate source ids keep their first position only.
    pub fn dispatching(run_id: u64, query: impl Into<String>, entries: Vec<SourceEntry>) -> Self {
        let mut items: Vec<(SourceEntry, SearchItemResult)> = Vec::with_capacity(entries.len());
        for entry in entries {
            if items.iter().all(|(e, _)| e.id != entry.id) {
                items.push((entry, SearchItemResult::Loading));
            }
        }
        Self {
            run_id,
            query: query.into(),
            phase: RunPhase::Dispatching,
            items,
        }
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Number of entries no longer `Loading`.
    pub fn progress(&self) -> usize {
        self.items.iter().filter(|(_, r)| r.is_settled()).count()
    }

    /// Number of dispatched entries.
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn is_settled(&self) -> bool {
        self.phase == RunPhase::Settled
    }

    /// Slots in dispatch order.
    pub fn items(&self) -> &[(SourceEntry, SearchItemResult)] {
        &self.items
    }

    pub fn get(&self, source_id: SourceId) -> Option<&SearchItemResult> {
        self.items
            .iter()
            .find(|(e, _)| e.id == source_id)
            .map(|(_, r)| r)
    }

    /// Slots ordered for display: sources with results first, then the
    /// shared pinned/label ordering.
    pub fn sorted_items(&self) -> Vec<&(SourceEntry, SearchItemResult)> {
        let mut sorted: Vec<_> = self.items.iter().collect();
        sorted.sort_by(|(a, ra), (b, rb)| {
            rb.has_results()
                .cmp(&ra.has_results())
                .then_with(|| compare_sources(&a.key(), &b.key()))
        });
        sorted
    }

    /// Display-ordered slots that finished with at least one result.
    pub fn with_results(&self) -> Vec<&(SourceEntry, SearchItemResult)> {
        self.sorted_items()
            .into_iter()
            .filter(|(_, r)| r.has_results())
            .collect()
    }

    /// Every result of every successful slot, in dispatch order.
    pub fn all_results(&self) -> impl Iterator<Item = &MangaResult> {
        self.items
            .iter()
            .filter_map(|(_, r)| r.results())
            .flatten()
    }

    /// Settle `source_id`'s slot. Returns `false` if the slot is unknown or
    /// already settled; settled slots never change again.
    pub(crate) fn settle(&mut self, source_id: SourceId, result: SearchItemResult) -> bool {
        if result.is_loading() {
            return false;
        }
        let Some((_, slot)) = self.items.iter_mut().find(|(e, _)| e.id == source_id) else {
            return false;
        };
        if slot.is_settled() {
            return false;
        }
        *slot = result;
        if self.items.iter().all(|(_, r)| r.is_settled()) {
            self.phase = RunPhase::Settled;
        }
        true
    }

    /// Leave `Dispatching` once every task has been handed out.
    pub(crate) fn mark_running(&mut self) -> bool {
        if self.phase != RunPhase::Dispatching {
            return false;
        }
        self.phase = if self.items.iter().all(|(_, r)| r.is_settled()) {
            RunPhase::Settled
        } else {
            RunPhase::Running
        };
        true
    }
}
