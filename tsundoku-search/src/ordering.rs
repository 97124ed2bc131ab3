//! Source ordering shared by search dispatch and source listings.
//!
//! Pinned sources come first, then sources are ordered by the
//! case-insensitive `"{name} ({lang})"` label. Every caller that orders
//! sources goes through [`compare_sources`] so listings and searches agree.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::source::Source;
use crate::types::SourceId;

/// The fields ordering looks at, borrowed from a source or a state entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceKey<'a> {
    pub id: SourceId,
    pub name: &'a str,
    pub lang: &'a str,
    pub pinned: bool,
}

impl<'a> SourceKey<'a> {
    /// Build the key for `source`, marking it pinned if its id is in `pinned`.
    pub fn of(source: &'a dyn Source, pinned: &BTreeSet<SourceId>) -> Self {
        Self {
            id: source.id(),
            name: source.name(),
            lang: source.lang(),
            pinned: pinned.contains(&source.id()),
        }
    }

    /// Lowercased `"{name} ({lang})"` label.
    pub fn sort_label(&self) -> String {
        format!("{} ({})", self.name.to_lowercase(), self.lang)
    }
}

/// Pinned first, then label, then id so that equal labels stay deterministic.
pub fn compare_sources(a: &SourceKey<'_>, b: &SourceKey<'_>) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then_with(|| a.sort_label().cmp(&b.sort_label()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort sources in place with [`compare_sources`].
pub fn sort_sources(sources: &mut [Arc<dyn Source>], pinned: &BTreeSet<SourceId>) {
    sources.sort_by(|a, b| {
        compare_sources(
            &SourceKey::of(a.as_ref(), pinned),
            &SourceKey::of(b.as_ref(), pinned),
        )
    });
}

/// Like [`sort_sources`], but `preferred` is moved ahead of everything else.
///
/// Migration search uses this to list the manga's current source first.
pub fn sort_sources_preferring(
    sources: &mut [Arc<dyn Source>],
    pinned: &BTreeSet<SourceId>,
    preferred: SourceId,
) {
    sources.sort_by(|a, b| {
        (b.id() == preferred).cmp(&(a.id() == preferred)).then_with(|| {
            compare_sources(
                &SourceKey::of(a.as_ref(), pinned),
                &SourceKey::of(b.as_ref(), pinned),
            )
        })
    });
}
