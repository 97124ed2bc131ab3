//! Source-related preferences.

use std::collections::BTreeSet;
use std::sync::Arc;

use tsundoku_search::{SourceFilter, SourceId};

use super::store::{Preference, PreferenceStore};
use crate::error::Result;

/// Languages enabled on a fresh install.
pub const DEFAULT_LANGUAGES: [&str; 2] = ["all", "en"];

/// Typed access to the source preferences.
#[derive(Debug, Clone)]
pub struct SourcePreferences {
    store: Arc<PreferenceStore>,
}

impl SourcePreferences {
    pub fn new(store: Arc<PreferenceStore>) -> Self {
        Self { store }
    }

    /// Language tags whose sources are shown and searched.
    pub fn enabled_languages(&self) -> Preference<BTreeSet<String>> {
        self.store.preference(
            "source_languages",
            DEFAULT_LANGUAGES.iter().map(|l| (*l).to_owned()).collect(),
        )
    }

    pub fn hidden_sources(&self) -> Preference<BTreeSet<SourceId>> {
        self.store.preference("hidden_catalogues", BTreeSet::new())
    }

    pub fn pinned_sources(&self) -> Preference<BTreeSet<SourceId>> {
        self.store.preference("pinned_catalogues", BTreeSet::new())
    }

    /// Restrict global search to pinned sources.
    pub fn pinned_only(&self) -> Preference<bool> {
        self.store.preference("search_pinned_sources_only", false)
    }

    /// Sources migration searches, in the user's order. Empty means every
    /// enabled source.
    pub fn migration_sources(&self) -> Preference<Vec<SourceId>> {
        self.store.preference("migration_sources", Vec::new())
    }

    /// Source the user browsed last.
    pub fn last_used_source(&self) -> Preference<Option<SourceId>> {
        self.store.preference("last_catalogue_source", None)
    }

    /// Hide result rows of sources that found nothing.
    pub fn only_with_results(&self) -> Preference<bool> {
        self.store.preference("global_search_only_with_results", false)
    }

    /// The enabled-source rules as the search crate expects them.
    pub fn source_filter(&self) -> SourceFilter {
        SourceFilter {
            languages: self.enabled_languages().get(),
            hidden: self.hidden_sources().get(),
            pinned: self.pinned_sources().get(),
            pinned_only: self.pinned_only().get(),
        }
    }

    /// Pin or unpin `id`. Returns whether it is pinned afterwards.
    ///
    /// # Errors
    ///
    /// Fails only if the set cannot be encoded.
    pub fn toggle_pinned(&self, id: SourceId) -> Result<bool> {
        toggle(&self.pinned_sources(), id)
    }

    /// Hide or unhide `id`. Returns whether it is hidden afterwards.
    ///
    /// # Errors
    ///
    /// Fails only if the set cannot be encoded.
    pub fn toggle_hidden(&self, id: SourceId) -> Result<bool> {
        toggle(&self.hidden_sources(), id)
    }

    /// Enable or disable a language. Returns whether it is enabled afterwards.
    ///
    /// # Errors
    ///
    /// Fails only if the set cannot be encoded.
    pub fn toggle_language(&self, lang: &str) -> Result<bool> {
        toggle(&self.enabled_languages(), lang.to_owned())
    }
}

fn toggle<T>(pref: &Preference<BTreeSet<T>>, item: T) -> Result<bool>
where
    T: Ord + Clone + serde::Serialize + serde::de::DeserializeOwned + Send + Sync + 'static,
{
    let mut set = pref.get();
    let now_present = if set.remove(&item) {
        false
    } else {
        set.insert(item);
        true
    };
    pref.set(&set)?;
    Ok(now_present)
}
