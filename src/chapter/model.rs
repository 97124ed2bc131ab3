//! Chapter records as the library layer sees them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a chapter row.
pub type ChapterId = i64;
/// Identifier of a library manga.
pub type MangaId = i64;

/// Chapter number used when none could be recognized.
pub const UNKNOWN_CHAPTER_NUMBER: f64 = -1.0;

/// A chapter of a manga. Read-only input to the filter/sort pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    /// Owning manga.
    pub manga_id: MangaId,
    /// Source-relative URL.
    pub url: String,
    pub name: String,
    /// Credited groups, possibly several separated by commas.
    pub scanlator: Option<String>,
    pub read: bool,
    pub bookmark: bool,
    /// Position in the source's own listing; 0 is the newest chapter.
    pub source_order: i64,
    /// Recognized chapter number, [`UNKNOWN_CHAPTER_NUMBER`] if none.
    pub chapter_number: f64,
    pub date_upload: Option<DateTime<Utc>>,
}

impl Default for Chapter {
    fn default() -> Self {
        Self {
            id: 0,
            manga_id: 0,
            url: String::new(),
            name: String::new(),
            scanlator: None,
            read: false,
            bookmark: false,
            source_order: 0,
            chapter_number: UNKNOWN_CHAPTER_NUMBER,
            date_upload: None,
        }
    }
}

impl Chapter {
    pub fn new(id: ChapterId, manga_id: MangaId, name: impl Into<String>) -> Self {
        Self {
            id,
            manga_id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether a chapter number was recognized.
    pub fn is_recognized_number(&self) -> bool {
        self.chapter_number >= 0.0
    }
}
