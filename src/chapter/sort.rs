//! Chapter ordering.
//!
//! "Descending" means newest first for every field. Since a source lists its
//! newest chapter at `source_order` 0, descending by source order is
//! ascending by the raw key.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::Chapter;

/// Field chapters are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// The source's own listing order.
    #[default]
    Source,
    /// Recognized chapter number.
    Number,
    /// Upload date; chapters without one sort as oldest.
    UploadDate,
    /// Chapter name, case-insensitive.
    Alphabet,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(Self::Source),
            "number" => Ok(Self::Number),
            "date" | "upload_date" => Ok(Self::UploadDate),
            "alpha" | "alphabet" | "name" => Ok(Self::Alphabet),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Number => "number",
            Self::UploadDate => "upload_date",
            Self::Alphabet => "alphabet",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Sort field plus direction. Ties always fall back to the source order
/// (newest first), so the output is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Descending
    }

    /// Full comparator: primary key in the requested direction, then
    /// source order.
    pub fn compare(&self, a: &Chapter, b: &Chapter) -> Ordering {
        self.compare_primary(a, b)
            .then_with(|| a.source_order.cmp(&b.source_order))
    }

    fn compare_primary(&self, a: &Chapter, b: &Chapter) -> Ordering {
        // Oldest-first ordering of the field.
        let oldest_first = match self.field {
            SortField::Source => b.source_order.cmp(&a.source_order),
            SortField::Number => a.chapter_number.total_cmp(&b.chapter_number),
            SortField::UploadDate => a.date_upload.cmp(&b.date_upload),
            SortField::Alphabet => compare_names(&a.name, &b.name),
        };
        match self.direction {
            SortDirection::Ascending => oldest_first,
            SortDirection::Descending => oldest_first.reverse(),
        }
    }

    /// Stable sort of borrowed chapters.
    pub fn sort(&self, chapters: &mut [&Chapter]) {
        chapters.sort_by(|a, b| self.compare(a, b));
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn chapter(source_order: i64, number: f64, name: &str) -> Chapter {
        Chapter {
            source_order,
            chapter_number: number,
            ..Chapter::new(source_order, 1, name)
        }
    }

    fn sorted_names(chapters: &[Chapter], spec: SortSpec) -> Vec<String> {
        let mut refs: Vec<&Chapter> = chapters.iter().collect();
        spec.sort(&mut refs);
        refs.iter().map(|c| c.name.clone()).collect()
    }

    fn sample() -> Vec<Chapter> {
        // Source lists newest first.
        vec![
            chapter(0, 3.0, "Ch3"),
            chapter(1, 2.0, "Ch2"),
            chapter(2, 1.0, "Ch1"),
        ]
    }

    #[test]
    fn source_descending_is_newest_first() {
        let spec = SortSpec::new(SortField::Source, SortDirection::Descending);
        assert_eq!(sorted_names(&sample(), spec), vec!["Ch3", "Ch2", "Ch1"]);
    }

    #[test]
    fn source_ascending_is_oldest_first() {
        let spec = SortSpec::new(SortField::Source, SortDirection::Ascending);
        assert_eq!(sorted_names(&sample(), spec), vec!["Ch1", "Ch2", "Ch3"]);
    }

    #[test]
    fn number_orders_by_recognized_number() {
        let chapters = vec![
            chapter(0, 10.0, "Ten"),
            chapter(1, 2.5, "TwoHalf"),
            chapter(2, -1.0, "Extra"),
        ];
        let asc = SortSpec::new(SortField::Number, SortDirection::Ascending);
        assert_eq!(sorted_names(&chapters, asc), vec!["Extra", "TwoHalf", "Ten"]);
        let desc = SortSpec::new(SortField::Number, SortDirection::Descending);
        assert_eq!(sorted_names(&chapters, desc), vec!["Ten", "TwoHalf", "Extra"]);
    }

    #[test]
    fn upload_date_puts_missing_dates_oldest() {
        let mut chapters = sample();
        chapters[0].date_upload = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single();
        chapters[2].date_upload = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).single();
        let desc = SortSpec::new(SortField::UploadDate, SortDirection::Descending);
        assert_eq!(sorted_names(&chapters, desc), vec!["Ch3", "Ch1", "Ch2"]);
    }

    #[test]
    fn alphabet_is_case_insensitive() {
        let chapters = vec![
            chapter(0, -1.0, "beta"),
            chapter(1, -1.0, "Alpha"),
            chapter(2, -1.0, "gamma"),
        ];
        let asc = SortSpec::new(SortField::Alphabet, SortDirection::Ascending);
        assert_eq!(sorted_names(&chapters, asc), vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn equal_keys_keep_source_order() {
        let chapters = vec![
            chapter(0, 5.0, "5 (group B)"),
            chapter(1, 5.0, "5 (group A)"),
            chapter(2, 4.0, "4"),
        ];
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let names = sorted_names(&chapters, SortSpec::new(SortField::Number, direction));
            let b = names.iter().position(|n| n == "5 (group B)").unwrap_or(usize::MAX);
            let a = names.iter().position(|n| n == "5 (group A)").unwrap_or(usize::MAX);
            assert!(b < a, "{direction:?}: {names:?}");
        }
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("date".parse::<SortField>(), Ok(SortField::UploadDate));
        assert_eq!("Alpha".parse::<SortField>(), Ok(SortField::Alphabet));
        assert!("random".parse::<SortField>().is_err());
        assert_eq!(SortField::Number.to_string(), "number");
        assert_eq!(SortDirection::Ascending.toggled(), SortDirection::Descending);
    }
}
