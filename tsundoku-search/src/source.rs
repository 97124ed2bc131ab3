//! Capability traits for pluggable manga sources.
//!
//! A [`Source`] only describes itself (id, name, language). What it can do is
//! queried through explicit capability lookups: [`Source::as_searchable`] for
//! catalogue search and [`Source::as_web`] for sources backed by a website.
//! Callers never downcast to concrete source types.

use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::types::{FilterList, MangaResult, SourceId};

/// A manga source known to the registry.
///
/// All implementations must be `Send + Sync`; sources are shared across the
/// concurrent per-source search tasks.
pub trait Source: Send + Sync {
    /// Stable numeric identifier.
    fn id(&self) -> SourceId;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Language tag (`"en"`, `"ja"`, `"all"`...).
    fn lang(&self) -> &str;

    /// Whether chapters of this source live on the device.
    fn is_local(&self) -> bool {
        false
    }

    /// Catalogue search capability, if the source has one.
    fn as_searchable(&self) -> Option<&dyn Searchable> {
        None
    }

    /// Website capability, if the source is backed by one.
    fn as_web(&self) -> Option<&dyn HasBaseUrl> {
        None
    }

    /// `"{name} ({lang})"`, the label used in listings.
    fn display_name(&self) -> String {
        format!("{} ({})", self.name(), self.lang())
    }
}

/// Catalogue search capability.
#[async_trait]
pub trait Searchable: Send + Sync {
    /// Search the source's catalogue.
    ///
    /// An empty `Ok` means the source answered with no matches; failures
    /// must be reported as `Err` so observers can tell the two apart.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError`] when the source cannot complete the
    /// search. Timeouts, if any, are the source's own business.
    async fn search(&self, query: &str, filters: &FilterList) -> Result<Vec<MangaResult>>;

    /// The filter list used when the caller does not supply one.
    fn default_filters(&self) -> FilterList {
        FilterList::default()
    }
}

/// Capability of sources backed by a website.
pub trait HasBaseUrl: Send + Sync {
    /// Base URL of the site, e.g. `https://example.org`.
    fn base_url(&self) -> &str;

    /// Resolve a source-relative manga URL into an absolute link.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Url`] if the base URL or the joined
    /// path is not a valid URL.
    fn absolute_url(&self, path: &str) -> Result<String> {
        let base = Url::parse(self.base_url())?;
        Ok(base.join(path)?.to_string())
    }
}
