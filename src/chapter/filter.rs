//! Tri-state chapter filters.
//!
//! Every filter follows the same policy: `Ignore` lets everything through,
//! `Include` keeps chapters meeting the condition, `Exclude` keeps chapters
//! failing it. Filters never reorder what they keep.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::Chapter;
use super::scanlator::passes_allow_list;
use crate::download::DownloadStatus;

pub use tsundoku_search::TriState;

/// Per-manga chapter filter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MangaFilterState {
    pub unread: TriState,
    pub bookmarked: TriState,
    pub downloaded: TriState,
    /// Scanlator allow-list. Empty disables the scanlator filter.
    pub scanlators: BTreeSet<String>,
}

impl MangaFilterState {
    /// Whether any filter would drop chapters.
    pub fn is_active(&self) -> bool {
        self.unread != TriState::Ignore
            || self.bookmarked != TriState::Ignore
            || self.downloaded != TriState::Ignore
            || !self.scanlators.is_empty()
    }
}

/// A [`MangaFilterState`] bound to the context needed to evaluate it.
pub struct ChapterFilter<'a> {
    state: &'a MangaFilterState,
    is_local: bool,
    downloads: &'a dyn DownloadStatus,
}

impl<'a> ChapterFilter<'a> {
    /// `is_local` makes every chapter count as downloaded.
    pub fn new(state: &'a MangaFilterState, is_local: bool, downloads: &'a dyn DownloadStatus) -> Self {
        Self {
            state,
            is_local,
            downloads,
        }
    }

    pub fn matches(&self, chapter: &Chapter) -> bool {
        self.state.unread.matches(!chapter.read)
            && self.state.bookmarked.matches(chapter.bookmark)
            && self.matches_downloaded(chapter)
            && passes_allow_list(chapter.scanlator.as_deref(), &self.state.scanlators)
    }

    fn matches_downloaded(&self, chapter: &Chapter) -> bool {
        if self.state.downloaded == TriState::Ignore {
            return true;
        }
        let downloaded = self.is_local || self.downloads.is_downloaded(chapter);
        self.state.downloaded.matches(downloaded)
    }

    /// Keep matching chapters in input order.
    pub fn apply<'c>(&self, chapters: impl IntoIterator<Item = &'c Chapter>) -> Vec<&'c Chapter> {
        chapters.into_iter().filter(|c| self.matches(c)).collect()
    }
}
