//! Grouped source listing for the browse screen.
//!
//! Sections come in a fixed order: the last used source, pinned sources,
//! then one section per language. Within a section sources follow the same
//! ordering search uses.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tsundoku_search::ordering::sort_sources;
use tsundoku_search::{Source, SourceFilter, SourceId, SourceRegistry};

/// Heading of a listing section.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceGroup {
    LastUsed,
    Pinned,
    Language(LanguageKey),
}

/// Language section key. `"all"` sorts first and the local `"other"`
/// language last; everything else alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LanguageKey {
    Multi,
    Tag(String),
    Other,
}

impl LanguageKey {
    fn of(lang: &str) -> Self {
        match lang {
            "all" => Self::Multi,
            "other" => Self::Other,
            tag => Self::Tag(tag.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Multi => "all",
            Self::Tag(tag) => tag,
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastUsed => f.write_str("Last used"),
            Self::Pinned => f.write_str("Pinned"),
            Self::Language(key) => f.write_str(key.as_str()),
        }
    }
}

pub struct SourceSection {
    pub group: SourceGroup,
    pub sources: Vec<Arc<dyn Source>>,
}

impl fmt::Debug for SourceSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSection")
            .field("group", &self.group)
            .field("sources", &self.sources.iter().map(|s| s.id()).collect::<Vec<_>>())
            .finish()
    }
}

/// Sections of sources shown for browsing.
///
/// Browsing ignores the pinned-only search restriction. The last used
/// source is listed in its own section and again in its normal one.
pub fn source_listing(
    registry: &SourceRegistry,
    filter: &SourceFilter,
    last_used: Option<SourceId>,
) -> Vec<SourceSection> {
    let browse_filter = SourceFilter {
        pinned_only: false,
        ..filter.clone()
    };
    let visible: Vec<Arc<dyn Source>> = registry
        .all()
        .iter()
        .filter(|s| browse_filter.allows(s.as_ref()))
        .cloned()
        .collect();

    let mut groups: BTreeMap<SourceGroup, Vec<Arc<dyn Source>>> = BTreeMap::new();
    for source in &visible {
        if Some(source.id()) == last_used {
            groups.entry(SourceGroup::LastUsed).or_default().push(Arc::clone(source));
        }
        let group = if filter.pinned.contains(&source.id()) {
            SourceGroup::Pinned
        } else {
            SourceGroup::Language(LanguageKey::of(source.lang()))
        };
        groups.entry(group).or_default().push(Arc::clone(source));
    }

    groups
        .into_iter()
        .map(|(group, mut sources)| {
            sort_sources(&mut sources, &filter.pinned);
            SourceSection { group, sources }
        })
        .collect()
}
