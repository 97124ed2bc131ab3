//! tsundoku: the library core of a manga reader.
//!
//! Two pieces carry the logic:
//!
//! - **Chapter filtering and sorting** ([`chapter`]): tri-state filters on
//!   read, bookmark and download state plus a scanlator allow-list, followed
//!   by a stable multi-key sort. Pure functions over borrowed chapters.
//! - **Multi-source search** ([`global_search`], [`migration`]): the
//!   `tsundoku-search` aggregator queries every enabled source concurrently
//!   and reports each source's result as it arrives.
//!
//! # Architecture
//!
//! Nothing is global: the source registry, the preference store and the
//! download lookup are handed to the components that need them.
//! - **Preferences**: reactive key/value store with typed handles
//! - **Config**: TOML file that seeds the preference store
//! - **Local source**: directory-backed source, always "downloaded"
//! - **Browse**: grouped source listing using the same ordering as search

pub mod browse;
pub mod chapter;
pub mod config;
pub mod download;
pub mod error;
pub mod global_search;
pub mod local_source;
pub mod manga;
pub mod migration;
pub mod preferences;
pub mod tsundoku_dirs;

pub use browse::{source_listing, SourceGroup, SourceSection};
pub use chapter::{Chapter, MangaFilterState, SortSpec, TriState};
pub use config::LibraryConfig;
pub use download::{DownloadIndex, DownloadStatus, NoDownloads};
pub use error::{LibraryError, Result};
pub use global_search::GlobalSearch;
pub use local_source::LocalSource;
pub use manga::{Manga, MangaChapterSettings, LOCAL_SOURCE_ID};
pub use migration::MigrationSearch;
pub use preferences::{LibraryPreferences, Preference, PreferenceStore, SourcePreferences};
pub use tsundoku_search::{
    AggregateSearchState, MangaResult, RunPhase, SearchConfig, SearchItemResult, Source, SourceId,
    SourceRegistry,
};
