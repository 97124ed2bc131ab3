//! Library manga and their per-manga chapter settings.

use serde::{Deserialize, Serialize};
use tsundoku_search::SourceId;

use crate::chapter::{chapter_view, Chapter, MangaFilterState, MangaId, SortSpec};
use crate::download::DownloadStatus;

/// Id reserved for the on-device source.
pub const LOCAL_SOURCE_ID: SourceId = 0;

/// Filter and sort a manga's chapter list is shown with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MangaChapterSettings {
    pub filter: MangaFilterState,
    pub sort: SortSpec,
}

/// A manga in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manga {
    pub id: MangaId,
    pub source_id: SourceId,
    pub title: String,
    /// Source-relative URL.
    pub url: String,
    pub favorite: bool,
    #[serde(default)]
    pub chapter_settings: MangaChapterSettings,
}

impl Manga {
    pub fn new(id: MangaId, source_id: SourceId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            source_id,
            title: title.into(),
            url: url.into(),
            favorite: false,
            chapter_settings: MangaChapterSettings::default(),
        }
    }

    pub fn with_chapter_settings(mut self, settings: MangaChapterSettings) -> Self {
        self.chapter_settings = settings;
        self
    }

    /// Whether the manga belongs to the on-device source.
    pub fn is_local(&self) -> bool {
        self.source_id == LOCAL_SOURCE_ID
    }

    /// This manga's chapters as the reader should see them.
    pub fn chapter_view<'c>(&self, chapters: &'c [Chapter], downloads: &dyn DownloadStatus) -> Vec<&'c Chapter> {
        chapter_view(
            chapters,
            &self.chapter_settings.filter,
            &self.chapter_settings.sort,
            self.is_local(),
            downloads,
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::chapter::TriState;
    use crate::download::NoDownloads;

    #[test]
    fn local_manga_counts_chapters_as_downloaded() {
        let chapters = vec![Chapter::new(1, 7, "Ch1"), Chapter::new(2, 7, "Ch2")];
        let settings = MangaChapterSettings {
            filter: MangaFilterState {
                downloaded: TriState::Include,
                ..Default::default()
            },
            ..Default::default()
        };

        let local = Manga::new(7, LOCAL_SOURCE_ID, "Local", "local").with_chapter_settings(settings.clone());
        assert_eq!(local.chapter_view(&chapters, &NoDownloads).len(), 2);

        let remote = Manga::new(7, 42, "Remote", "/m/7").with_chapter_settings(settings);
        assert!(remote.chapter_view(&chapters, &NoDownloads).is_empty());
    }

    #[test]
    fn settings_default_when_missing_from_json() {
        let manga: Manga = serde_json::from_str(
            r#"{"id":1,"source_id":3,"title":"T","url":"/t","favorite":true}"#,
        )
        .unwrap();
        assert_eq!(manga.chapter_settings, MangaChapterSettings::default());
        assert!(manga.favorite);
    }
}
