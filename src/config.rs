//! Configuration types for the tsundoku library layer.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tsundoku_search::{SearchConfig, SourceId};

use crate::error::{LibraryError, Result};
use crate::manga::MangaChapterSettings;
use crate::preferences::{LibraryPreferences, PreferenceStore, SourcePreferences, DEFAULT_LANGUAGES};

/// Top-level configuration, stored as TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub library: LibrarySection,
    pub sources: SourcesSection,
    pub search: SearchSection,
}

/// Library settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySection {
    /// Root of the local source. `None` uses the data directory.
    pub root_dir: Option<PathBuf>,
    /// Chapter filter and sort for newly added manga.
    pub default_chapter_settings: MangaChapterSettings,
}

/// Which sources are shown and searched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesSection {
    /// Language tags. Empty allows every language.
    pub enabled_languages: BTreeSet<String>,
    pub hidden_sources: BTreeSet<SourceId>,
    pub pinned_sources: BTreeSet<SourceId>,
    /// Sources used by migration search, in order. Empty means every
    /// enabled source.
    pub migration_sources: Vec<SourceId>,
}

impl Default for SourcesSection {
    fn default() -> Self {
        Self {
            enabled_languages: DEFAULT_LANGUAGES.iter().map(|l| (*l).to_owned()).collect(),
            hidden_sources: BTreeSet::new(),
            pinned_sources: BTreeSet::new(),
            migration_sources: Vec::new(),
        }
    }
}

/// Global search behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Per-source searches allowed in flight at once.
    pub max_concurrent_sources: usize,
    /// Search pinned sources only.
    pub pinned_only: bool,
    /// Hide sources without results once they settle.
    pub only_with_results: bool,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            max_concurrent_sources: SearchConfig::default().max_concurrent_sources,
            pinned_only: false,
            only_with_results: false,
        }
    }
}

impl LibraryConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LibraryError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| LibraryError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/tsundoku/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::tsundoku_dirs::config_file()
    }

    /// Load from `path` if it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Local source root, resolved.
    pub fn local_root(&self) -> PathBuf {
        self.library
            .root_dir
            .clone()
            .unwrap_or_else(crate::tsundoku_dirs::local_library_dir)
    }

    /// Aggregator settings derived from the `[search]` section.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_concurrent_sources: self.search.max_concurrent_sources,
            ..SearchConfig::default()
        }
    }

    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] if the search settings are invalid.
    pub fn validate(&self) -> Result<()> {
        self.search_config()
            .validate()
            .map_err(|e| LibraryError::Config(e.to_string()))
    }

    /// A preference store seeded with these settings.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Preference`] if a value cannot be encoded.
    pub fn into_preferences(&self) -> Result<Arc<PreferenceStore>> {
        let store = PreferenceStore::new();

        let sources = SourcePreferences::new(Arc::clone(&store));
        sources.enabled_languages().set(&self.sources.enabled_languages)?;
        sources.hidden_sources().set(&self.sources.hidden_sources)?;
        sources.pinned_sources().set(&self.sources.pinned_sources)?;
        sources.migration_sources().set(&self.sources.migration_sources)?;
        sources.pinned_only().set(&self.search.pinned_only)?;
        sources.only_with_results().set(&self.search.only_with_results)?;

        LibraryPreferences::new(Arc::clone(&store))
            .default_chapter_settings()
            .set(&self.library.default_chapter_settings)?;

        Ok(store)
    }
}
