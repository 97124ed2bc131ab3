//! Chapter filtering and sorting.
//!
//! The pipeline is a pure transformation: [`view::chapter_view`] filters a
//! manga's chapters with its [`MangaFilterState`] and orders the survivors
//! with its [`SortSpec`]. The input list is never mutated.

pub mod filter;
pub mod model;
pub mod recognition;
pub mod scanlator;
pub mod sort;
pub mod view;

pub use filter::{ChapterFilter, MangaFilterState, TriState};
pub use model::{Chapter, ChapterId, MangaId, UNKNOWN_CHAPTER_NUMBER};
pub use recognition::recognize_chapter_number;
pub use scanlator::{available_scanlators, passes_allow_list, scanlator_tokens, SCANLATOR_DELIMITER};
pub use sort::{SortDirection, SortField, SortSpec};
pub use view::{chapter_view, missing_chapters_count, next_unread};
