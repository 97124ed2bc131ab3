//! Source registry and the rules that pick which sources a search hits.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::ordering::sort_sources;
use crate::source::Source;
use crate::types::SourceId;

/// Caller-supplied rules for choosing the enabled sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFilter {
    /// Allowed language tags. Empty means every language is allowed.
    pub languages: BTreeSet<String>,
    /// Sources the user hid.
    pub hidden: BTreeSet<SourceId>,
    /// Sources the user pinned.
    pub pinned: BTreeSet<SourceId>,
    /// Restrict to pinned sources only.
    pub pinned_only: bool,
}

impl SourceFilter {
    /// Whether `source` passes the language, hidden and pinned-only rules.
    ///
    /// Local sources ignore the language allow-list.
    pub fn allows(&self, source: &dyn Source) -> bool {
        let id = source.id();
        if self.hidden.contains(&id) {
            return false;
        }
        if self.pinned_only && !self.pinned.contains(&id) {
            return false;
        }
        source.is_local() || self.languages.is_empty() || self.languages.contains(source.lang())
    }
}

/// Registry of every source known to the application.
///
/// Registration order is irrelevant; lookups that return lists order them
/// with [`crate::ordering`].
#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn Source>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source, replacing any previously registered source with the same id.
    pub fn register(&mut self, source: Arc<dyn Source>) {
        let id = source.id();
        if let Some(slot) = self.sources.iter_mut().find(|s| s.id() == id) {
            tracing::debug!(source_id = id, "replacing registered source");
            *slot = source;
        } else {
            self.sources.push(source);
        }
    }

    pub fn get(&self, id: SourceId) -> Option<Arc<dyn Source>> {
        self.sources.iter().find(|s| s.id() == id).cloned()
    }

    pub fn all(&self) -> &[Arc<dyn Source>] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Languages offered by registered sources, sorted.
    pub fn languages(&self) -> BTreeSet<String> {
        self.sources.iter().map(|s| s.lang().to_owned()).collect()
    }

    /// Searchable sources passing `filter`, pinned first then by label.
    pub fn enabled_sources(&self, filter: &SourceFilter) -> Vec<Arc<dyn Source>> {
        let mut enabled: Vec<Arc<dyn Source>> = self
            .sources
            .iter()
            .filter(|s| s.as_searchable().is_some())
            .filter(|s| filter.allows(s.as_ref()))
            .cloned()
            .collect();
        sort_sources(&mut enabled, &filter.pinned);
        enabled
    }

    /// The subset of `ids` that is registered and searchable, in `ids` order.
    ///
    /// Unknown ids are skipped.
    pub fn subset(&self, ids: &[SourceId]) -> Vec<Arc<dyn Source>> {
        ids.iter()
            .filter_map(|id| self.get(*id))
            .filter(|s| s.as_searchable().is_some())
            .collect()
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.sources.iter().map(|s| s.display_name()))
            .finish()
    }
}
