//! The chapter list a reader sees: filter, then sort.

use std::collections::BTreeSet;

use super::filter::{ChapterFilter, MangaFilterState};
use super::model::Chapter;
use super::sort::{SortDirection, SortSpec};
use crate::download::DownloadStatus;

/// Filter `chapters` with `filter` and order the survivors with `sort`.
///
/// The input slice is left untouched; the result borrows from it.
pub fn chapter_view<'c>(
    chapters: &'c [Chapter],
    filter: &MangaFilterState,
    sort: &SortSpec,
    is_local: bool,
    downloads: &dyn DownloadStatus,
) -> Vec<&'c Chapter> {
    let mut view = ChapterFilter::new(filter, is_local, downloads).apply(chapters);
    sort.sort(&mut view);
    view
}

/// The chapter to continue with: the earliest unread chapter in reading
/// order. Reading order is the ascending form of `sort`, whatever the
/// view's display direction.
pub fn next_unread<'c>(view: &[&'c Chapter], sort: &SortSpec) -> Option<&'c Chapter> {
    let reading = SortSpec::new(sort.field, SortDirection::Ascending);
    view.iter()
        .copied()
        .filter(|c| !c.read)
        .min_by(|a, b| reading.compare(a, b))
}

/// Number of whole chapter numbers missing between 1 and the highest known
/// chapter. Unrecognized numbers are ignored.
pub fn missing_chapters_count<'c>(chapters: impl IntoIterator<Item = &'c Chapter>) -> usize {
    let numbers: BTreeSet<i64> = chapters
        .into_iter()
        .filter(|c| c.is_recognized_number())
        .map(|c| c.chapter_number.floor() as i64)
        .collect();

    let mut missing = 0;
    let mut previous = 0;
    for current in numbers {
        if current > previous + 1 {
            missing += (current - previous - 1) as usize;
        }
        previous = current;
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapter::{SortField, TriState};
    use crate::download::NoDownloads;

    fn numbered(order: i64, number: f64, read: bool) -> Chapter {
        Chapter {
            read,
            source_order: order,
            chapter_number: number,
            ..Chapter::new(order, 1, format!("Ch{number}"))
        }
    }

    fn names(view: &[&Chapter]) -> Vec<String> {
        view.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn filters_then_sorts_without_touching_input() {
        let chapters = vec![
            numbered(0, 3.0, false),
            numbered(1, 2.0, true),
            numbered(2, 1.0, false),
        ];
        let before = chapters.clone();
        let filter = MangaFilterState {
            unread: TriState::Include,
            ..Default::default()
        };
        let sort = SortSpec::new(SortField::Number, SortDirection::Ascending);

        let view = chapter_view(&chapters, &filter, &sort, false, &NoDownloads);
        assert_eq!(names(&view), vec!["Ch1", "Ch3"]);
        assert_eq!(chapters, before);
    }

    #[test]
    fn next_unread_follows_reading_order() {
        let chapters = vec![
            numbered(0, 3.0, false),
            numbered(1, 2.0, false),
            numbered(2, 1.0, true),
        ];
        let desc = SortSpec::new(SortField::Source, SortDirection::Descending);
        let view = chapter_view(&chapters, &MangaFilterState::default(), &desc, false, &NoDownloads);
        assert_eq!(next_unread(&view, &desc).map(|c| c.name.as_str()), Some("Ch2"));

        let asc = SortSpec::new(SortField::Source, SortDirection::Ascending);
        let view = chapter_view(&chapters, &MangaFilterState::default(), &asc, false, &NoDownloads);
        assert_eq!(next_unread(&view, &asc).map(|c| c.name.as_str()), Some("Ch2"));
    }

    #[test]
    fn next_unread_same_for_both_directions_on_equal_numbers() {
        let chapters = vec![
            Chapter {
                name: "5 (group B)".into(),
                ..numbered(0, 5.0, false)
            },
            Chapter {
                name: "5 (group A)".into(),
                ..numbered(1, 5.0, false)
            },
            numbered(2, 4.0, true),
        ];
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let spec = SortSpec::new(SortField::Number, direction);
            let view = chapter_view(&chapters, &MangaFilterState::default(), &spec, false, &NoDownloads);
            assert_eq!(
                next_unread(&view, &spec).map(|c| c.name.as_str()),
                Some("5 (group B)"),
                "{direction:?}"
            );
        }
    }

    #[test]
    fn next_unread_none_when_all_read() {
        let chapters = vec![numbered(0, 1.0, true)];
        let spec = SortSpec::default();
        let view = chapter_view(&chapters, &MangaFilterState::default(), &spec, false, &NoDownloads);
        assert!(next_unread(&view, &spec).is_none());
    }

    #[test]
    fn missing_chapters_counts_gaps() {
        let chapters = vec![
            numbered(0, 1.0, false),
            numbered(1, 2.5, false),
            numbered(2, 5.0, false),
            numbered(3, -1.0, false),
            numbered(4, 8.0, false),
        ];
        // Missing: 3, 4, 6, 7.
        assert_eq!(missing_chapters_count(&chapters), 4);
    }

    #[test]
    fn missing_chapters_counts_leading_gap() {
        let chapters = vec![numbered(0, 3.0, false)];
        assert_eq!(missing_chapters_count(&chapters), 2);
        assert_eq!(missing_chapters_count(&Vec::<Chapter>::new()), 0);
    }
}
