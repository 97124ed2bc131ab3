//! On-device source backed by a directory tree.
//!
//! Layout: every subdirectory of the root is a manga; inside it, every
//! directory or archive file is a chapter.
//!
//! ```text
//! root/
//!   Yotsuba/
//!     cover.jpg
//!     Ch. 1/
//!     Ch. 2.cbz
//! ```

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tsundoku_search::{FilterList, MangaResult, SearchError, Searchable, Source, SourceId};

use crate::chapter::{recognize_chapter_number, Chapter, MangaId};
use crate::error::{LibraryError, Result};
use crate::manga::{Manga, LOCAL_SOURCE_ID};

/// File extensions read as chapter archives.
pub const CHAPTER_ARCHIVE_EXTENSIONS: [&str; 7] = ["cbz", "zip", "epub", "rar", "cbr", "7z", "cb7"];

const COVER_FILE_NAMES: [&str; 4] = ["cover.jpg", "cover.jpeg", "cover.png", "cover.webp"];

/// Directory-backed source.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every manga directory, sorted by title.
    ///
    /// A missing root is an empty library.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the root exists but cannot be listed.
    pub async fn list_manga(&self) -> Result<Vec<MangaResult>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(root = %self.root.display(), "local library root missing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut manga = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Some(title) = visible_name(&entry.path()) else {
                continue;
            };
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let mut result = MangaResult::new(LOCAL_SOURCE_ID, title.clone(), title);
            result.thumbnail_url = find_cover(&entry.path()).await;
            manga.push(result);
        }
        manga.sort_by(|a, b| compare_names(&a.title, &b.title));
        Ok(manga)
    }

    /// Library entry for the manga directory `url`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Local`] if the directory does not exist.
    pub async fn manga(&self, id: MangaId, url: &str) -> Result<Manga> {
        let dir = self.manga_dir(url)?;
        if !tokio::fs::metadata(&dir).await.is_ok_and(|m| m.is_dir()) {
            return Err(LibraryError::Local(format!("no manga directory '{url}'")));
        }
        Ok(Manga::new(id, LOCAL_SOURCE_ID, url, url))
    }

    /// Chapters of `manga`, newest first (`source_order` 0 is the highest
    /// chapter number).
    ///
    /// Chapter ids are positions within the manga.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Local`] if the manga directory is missing, or
    /// an I/O error if it cannot be read.
    pub async fn chapters(&self, manga: &Manga) -> Result<Vec<Chapter>> {
        let dir = self.manga_dir(&manga.url)?;
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LibraryError::Local(format!("no manga directory '{}'", manga.url)),
            _ => LibraryError::Io(e),
        })?;

        let mut chapters = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(file_name) = visible_name(&path) else {
                continue;
            };
            let metadata = entry.metadata().await?;
            let name = if metadata.is_dir() {
                file_name.clone()
            } else if is_chapter_archive(&path) {
                path.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file_name.clone())
            } else {
                continue;
            };

            chapters.push(Chapter {
                manga_id: manga.id,
                url: format!("{}/{}", manga.url, file_name),
                chapter_number: recognize_chapter_number(&manga.title, &name),
                date_upload: metadata.modified().ok().map(DateTime::<Utc>::from),
                ..Chapter::new(0, manga.id, name)
            });
        }

        chapters.sort_by(|a, b| {
            b.chapter_number
                .total_cmp(&a.chapter_number)
                .then_with(|| compare_names(&b.name, &a.name))
        });
        for (position, chapter) in chapters.iter_mut().enumerate() {
            chapter.source_order = position as i64;
            chapter.id = position as i64;
        }
        tracing::debug!(manga = %manga.url, count = chapters.len(), "listed local chapters");
        Ok(chapters)
    }

    fn manga_dir(&self, url: &str) -> Result<PathBuf> {
        let relative = Path::new(url);
        let single_component = relative.components().count() == 1
            && matches!(relative.components().next(), Some(std::path::Component::Normal(_)));
        if !single_component {
            return Err(LibraryError::Local(format!("invalid manga path '{url}'")));
        }
        Ok(self.root.join(relative))
    }
}

impl Source for LocalSource {
    fn id(&self) -> SourceId {
        LOCAL_SOURCE_ID
    }

    fn name(&self) -> &str {
        "Local source"
    }

    fn lang(&self) -> &str {
        "other"
    }

    fn is_local(&self) -> bool {
        true
    }

    fn as_searchable(&self) -> Option<&dyn Searchable> {
        Some(self)
    }
}

#[async_trait]
impl Searchable for LocalSource {
    async fn search(&self, query: &str, _filters: &FilterList) -> tsundoku_search::Result<Vec<MangaResult>> {
        let needle = query.trim().to_lowercase();
        let manga = self
            .list_manga()
            .await
            .map_err(|e| SearchError::Source(e.to_string()))?;
        Ok(manga
            .into_iter()
            .filter(|m| needle.is_empty() || m.title.to_lowercase().contains(&needle))
            .collect())
    }
}

/// File name unless it is hidden or not valid UTF-8.
fn visible_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    (!name.starts_with('.')).then(|| name.to_owned())
}

fn is_chapter_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            CHAPTER_ARCHIVE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

async fn find_cover(manga_dir: &Path) -> Option<String> {
    for name in COVER_FILE_NAMES {
        let candidate = manga_dir.join(name);
        if tokio::fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate.to_string_lossy().into_owned());
        }
    }
    None
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn library() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let yotsuba = dir.path().join("Yotsuba");
        std::fs::create_dir_all(yotsuba.join("Ch. 1")).unwrap();
        std::fs::write(yotsuba.join("Ch. 2.cbz"), b"").unwrap();
        std::fs::write(yotsuba.join("Ch. 10.CBR"), b"").unwrap();
        std::fs::write(yotsuba.join("notes.txt"), b"").unwrap();
        std::fs::write(yotsuba.join("cover.png"), b"").unwrap();
        std::fs::create_dir_all(yotsuba.join(".thumbs")).unwrap();
        std::fs::create_dir_all(dir.path().join("Berserk")).unwrap();
        std::fs::create_dir_all(dir.path().join(".trash")).unwrap();
        std::fs::write(dir.path().join("stray.cbz"), b"").unwrap();
        dir
    }

    #[tokio::test]
    async fn lists_manga_directories_sorted() {
        let dir = library();
        let source = LocalSource::new(dir.path());
        let manga = source.list_manga().await.unwrap();
        let titles: Vec<&str> = manga.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Berserk", "Yotsuba"]);
        assert!(manga[1].thumbnail_url.as_deref().unwrap().ends_with("cover.png"));
        assert!(manga[0].thumbnail_url.is_none());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_blank_lists_all() {
        let dir = library();
        let source = LocalSource::new(dir.path());
        let hits = source.search("YOTS", &FilterList::default()).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "Yotsuba");
        assert_eq!(source.search("  ", &FilterList::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalSource::new(dir.path().join("absent"));
        assert!(source.search("", &FilterList::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn chapters_are_newest_first_with_numbers() {
        let dir = library();
        let source = LocalSource::new(dir.path());
        let manga = source.manga(9, "Yotsuba").await.unwrap();
        let chapters = source.chapters(&manga).await.unwrap();

        let names: Vec<&str> = chapters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ch. 10", "Ch. 2", "Ch. 1"]);
        let orders: Vec<i64> = chapters.iter().map(|c| c.source_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert!((chapters[0].chapter_number - 10.0).abs() < f64::EPSILON);
        assert!(chapters.iter().all(|c| c.manga_id == 9 && c.date_upload.is_some()));
        assert_eq!(chapters[1].url, "Yotsuba/Ch. 2.cbz");
    }

    #[tokio::test]
    async fn unknown_or_escaping_manga_is_rejected() {
        let dir = library();
        let source = LocalSource::new(dir.path());
        assert!(matches!(source.manga(1, "Nope").await, Err(LibraryError::Local(_))));
        assert!(matches!(source.manga(1, "../etc").await, Err(LibraryError::Local(_))));
    }

    #[test]
    fn source_capabilities() {
        let source = LocalSource::new("/tmp");
        assert!(source.is_local());
        assert!(source.as_searchable().is_some());
        assert!(source.as_web().is_none());
        assert_eq!(source.display_name(), "Local source (other)");
    }
}
