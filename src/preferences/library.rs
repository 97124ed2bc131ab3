//! Library-wide preferences.

use std::sync::Arc;

use super::store::{Preference, PreferenceStore};
use crate::manga::{Manga, MangaChapterSettings};

#[derive(Debug, Clone)]
pub struct LibraryPreferences {
    store: Arc<PreferenceStore>,
}

impl LibraryPreferences {
    pub fn new(store: Arc<PreferenceStore>) -> Self {
        Self { store }
    }

    /// Chapter filter and sort given to manga added to the library.
    pub fn default_chapter_settings(&self) -> Preference<MangaChapterSettings> {
        self.store
            .preference("default_chapter_settings", MangaChapterSettings::default())
    }

    /// Reset `manga`'s chapter settings to the library default.
    pub fn apply_defaults(&self, manga: &mut Manga) {
        manga.chapter_settings = self.default_chapter_settings().get();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::chapter::{SortDirection, SortField, SortSpec, TriState};

    #[test]
    fn new_manga_receive_library_defaults() {
        let prefs = LibraryPreferences::new(PreferenceStore::new());
        let mut defaults = MangaChapterSettings::default();
        defaults.filter.unread = TriState::Include;
        defaults.sort = SortSpec::new(SortField::Number, SortDirection::Ascending);
        prefs.default_chapter_settings().set(&defaults).unwrap();

        let mut manga = Manga::new(1, 5, "Title", "/t");
        prefs.apply_defaults(&mut manga);
        assert_eq!(manga.chapter_settings, defaults);
    }
}
