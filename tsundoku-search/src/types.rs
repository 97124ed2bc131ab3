//! Core types for search results and source filter parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a source.
pub type SourceId = i64;

/// A single manga returned by a source's search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MangaResult {
    /// The source that returned this entry.
    pub source_id: SourceId,
    /// Source-relative URL or path identifying the manga on its source.
    pub url: String,
    /// Display title.
    pub title: String,
    /// Cover image URL, if the source exposes one in search listings.
    pub thumbnail_url: Option<String>,
    /// Author as listed by the source.
    pub author: Option<String>,
    /// Absolute link to the manga page, resolved for web-backed sources.
    #[serde(default)]
    pub link: Option<String>,
}

impl MangaResult {
    /// Create a result with only the identifying fields set.
    pub fn new(source_id: SourceId, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_id,
            url: url.into(),
            title: title.into(),
            thumbnail_url: None,
            author: None,
            link: None,
        }
    }
}

/// Three-way toggle shared by source-defined filters and chapter filters.
///
/// `Ignore` lets everything through, `Include` keeps what meets the
/// condition, `Exclude` keeps what fails it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    #[default]
    Ignore,
    Include,
    Exclude,
}

impl TriState {
    /// Apply the toggle to a condition.
    pub fn matches(self, condition: bool) -> bool {
        match self {
            Self::Ignore => true,
            Self::Include => condition,
            Self::Exclude => !condition,
        }
    }

    /// Next value when the toggle is tapped: ignore → include → exclude → ignore.
    pub fn next(self) -> Self {
        match self {
            Self::Ignore => Self::Include,
            Self::Include => Self::Exclude,
            Self::Exclude => Self::Ignore,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Include => "include",
            Self::Exclude => "exclude",
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" | "off" => Ok(Self::Ignore),
            "include" | "on" => Ok(Self::Include),
            "exclude" => Ok(Self::Exclude),
            other => Err(format!("unknown filter state '{other}' (expected include, exclude or ignore)")),
        }
    }
}

/// A single source-defined search filter and its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Free-text field (author, artist...).
    Text { name: String, value: String },
    /// Boolean toggle.
    CheckBox { name: String, checked: bool },
    /// Three-way toggle (usually genres).
    TriState { name: String, state: TriState },
    /// One-of-many choice; `selected` indexes into `values`.
    Select {
        name: String,
        values: Vec<String>,
        selected: usize,
    },
}

impl Filter {
    /// The filter's display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. }
            | Self::CheckBox { name, .. }
            | Self::TriState { name, .. }
            | Self::Select { name, .. } => name,
        }
    }

    /// Whether this filter differs from its neutral value.
    pub fn is_active(&self) -> bool {
        match self {
            Self::Text { value, .. } => !value.trim().is_empty(),
            Self::CheckBox { checked, .. } => *checked,
            Self::TriState { state, .. } => *state != TriState::Ignore,
            Self::Select { selected, .. } => *selected != 0,
        }
    }
}

/// Ordered set of filter parameters passed to a source's search.
///
/// The meaning of each filter is defined by the source; the aggregator only
/// forwards the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterList(pub Vec<Filter>);

impl FilterList {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self(filters)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.0.iter()
    }

    /// Look up a filter by display name.
    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.0.iter().find(|f| f.name() == name)
    }

    /// Whether any filter deviates from its neutral value.
    pub fn has_active(&self) -> bool {
        self.0.iter().any(Filter::is_active)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn sample_filters() -> FilterList {
        FilterList::new(vec![
            Filter::Text {
                name: "Author".into(),
                value: String::new(),
            },
            Filter::TriState {
                name: "Romance".into(),
                state: TriState::Exclude,
            },
            Filter::Select {
                name: "Status".into(),
                values: vec!["Any".into(), "Ongoing".into()],
                selected: 0,
            },
        ])
    }

    #[test]
    fn manga_result_new_leaves_optional_fields_empty() {
        let result = MangaResult::new(7, "/manga/1", "Title");
        assert_eq!(result.source_id, 7);
        assert!(result.thumbnail_url.is_none());
        assert!(result.author.is_none());
        assert!(result.link.is_none());
    }

    #[test]
    fn manga_result_without_link_deserializes() {
        let json = r#"{"source_id":1,"url":"/m/1","title":"T","thumbnail_url":null,"author":null}"#;
        let result: MangaResult = serde_json::from_str(json).expect("deserialize");
        assert!(result.link.is_none());
    }

    #[test]
    fn tri_state_policy() {
        assert!(TriState::Ignore.matches(true));
        assert!(TriState::Ignore.matches(false));
        assert!(TriState::Include.matches(true));
        assert!(!TriState::Include.matches(false));
        assert!(!TriState::Exclude.matches(true));
        assert!(TriState::Exclude.matches(false));
    }

    #[test]
    fn tri_state_cycles() {
        assert_eq!(TriState::Ignore.next(), TriState::Include);
        assert_eq!(TriState::Include.next(), TriState::Exclude);
        assert_eq!(TriState::Exclude.next(), TriState::Ignore);
    }

    #[test]
    fn tri_state_parses_cli_words() {
        assert_eq!("Include".parse::<TriState>(), Ok(TriState::Include));
        assert_eq!("off".parse::<TriState>(), Ok(TriState::Ignore));
        assert!("maybe".parse::<TriState>().is_err());
        assert_eq!(TriState::Exclude.to_string(), "exclude");
    }

    #[test]
    fn tri_state_filter_json_is_lowercase() {
        let filter = Filter::TriState {
            name: "Romance".into(),
            state: TriState::Exclude,
        };
        let json = serde_json::to_value(&filter).expect("serialize");
        assert_eq!(json["type"], "tri_state");
        assert_eq!(json["state"], "exclude");
    }

    #[test]
    fn filter_lookup_by_name() {
        let filters = sample_filters();
        assert!(filters.get("Romance").is_some());
        assert!(filters.get("Missing").is_none());
    }

    #[test]
    fn active_filters_detected() {
        let filters = sample_filters();
        assert!(filters.has_active());

        let neutral = FilterList::new(vec![Filter::CheckBox {
            name: "Completed".into(),
            checked: false,
        }]);
        assert!(!neutral.has_active());
        assert!(FilterList::default().is_empty());
    }

    #[test]
    fn filter_json_uses_tagged_layout() {
        let filter = Filter::CheckBox {
            name: "Completed".into(),
            checked: true,
        };
        let json = serde_json::to_value(&filter).expect("serialize");
        assert_eq!(json["type"], "check_box");
        assert_eq!(json["checked"], true);
    }
}
