//! Download-state lookup used by the downloaded filter.
//!
//! The download manager itself lives outside this crate; the filter only
//! needs to ask whether a chapter is on disk.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use crate::chapter::{Chapter, ChapterId};

/// Answers whether a chapter has been downloaded.
///
/// A lookup that knows nothing about a chapter must answer `false`.
pub trait DownloadStatus: Send + Sync {
    fn is_downloaded(&self, chapter: &Chapter) -> bool;
}

/// Lookup for callers without a download manager: nothing is downloaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDownloads;

impl DownloadStatus for NoDownloads {
    fn is_downloaded(&self, _chapter: &Chapter) -> bool {
        false
    }
}

/// In-memory index of downloaded chapter ids, kept current by whoever
/// performs downloads.
#[derive(Debug, Default)]
pub struct DownloadIndex {
    chapters: RwLock<HashSet<ChapterId>>,
}

impl DownloadIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_downloaded(&self, chapter_id: ChapterId) {
        self.chapters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chapter_id);
    }

    /// Returns `true` if the chapter was indexed.
    pub fn remove(&self, chapter_id: ChapterId) -> bool {
        self.chapters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&chapter_id)
    }

    pub fn len(&self) -> usize {
        self.chapters.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<ChapterId> for DownloadIndex {
    fn from_iter<I: IntoIterator<Item = ChapterId>>(iter: I) -> Self {
        Self {
            chapters: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl DownloadStatus for DownloadIndex {
    fn is_downloaded(&self, chapter: &Chapter) -> bool {
        self.chapters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&chapter.id)
    }
}
