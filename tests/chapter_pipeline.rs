//! Integration tests: chapter filter + sort pipeline.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;

use tsundoku::chapter::{
    chapter_view, ChapterFilter, MangaFilterState, SortDirection, SortField, SortSpec, TriState,
};
use tsundoku::{Chapter, DownloadIndex, Manga, MangaChapterSettings, NoDownloads, LOCAL_SOURCE_ID};

const STATES: [TriState; 3] = [TriState::Ignore, TriState::Include, TriState::Exclude];

/// Twelve chapters covering every read/bookmark combination, some
/// duplicated chapter numbers and a few scanlator credits.
fn sample_chapters() -> Vec<Chapter> {
    (0..12)
        .map(|i: i64| Chapter {
            read: i % 2 == 0,
            bookmark: i % 3 == 0,
            source_order: i,
            chapter_number: (12 - i) as f64 / 2.0,
            scanlator: match i % 4 {
                0 => Some("GroupA, GroupB".to_owned()),
                1 => Some("GroupC".to_owned()),
                2 => None,
                _ => Some("Tom & Jerry".to_owned()),
            },
            ..Chapter::new(i + 100, 1, format!("Chapter {i}"))
        })
        .collect()
}

fn filter_states() -> Vec<MangaFilterState> {
    let mut all = Vec::new();
    for unread in STATES {
        for bookmarked in STATES {
            for downloaded in STATES {
                all.push(MangaFilterState {
                    unread,
                    bookmarked,
                    downloaded,
                    scanlators: BTreeSet::new(),
                });
            }
        }
    }
    all
}

fn ids(chapters: &[&Chapter]) -> Vec<i64> {
    chapters.iter().map(|c| c.id).collect()
}

#[test]
fn unread_include_scenario() {
    let chapters = vec![
        Chapter::new(1, 1, "Ch1"),
        Chapter {
            read: true,
            ..Chapter::new(2, 1, "Ch2")
        },
    ];
    let state = MangaFilterState {
        unread: TriState::Include,
        ..Default::default()
    };
    let view = chapter_view(&chapters, &state, &SortSpec::default(), false, &NoDownloads);
    assert_eq!(ids(&view), vec![1]);
}

#[test]
fn multi_group_scanlator_passes_allow_list() {
    let chapters = vec![Chapter {
        scanlator: Some("GroupA, GroupB".to_owned()),
        ..Chapter::new(1, 1, "Ch1")
    }];
    let state = MangaFilterState {
        scanlators: BTreeSet::from(["GroupA".to_owned()]),
        ..Default::default()
    };
    let view = chapter_view(&chapters, &state, &SortSpec::default(), false, &NoDownloads);
    assert_eq!(view.len(), 1);
}

#[test]
fn filtering_is_idempotent() {
    let chapters = sample_chapters();
    let downloads: DownloadIndex = [100, 103, 107].into_iter().collect();
    for state in filter_states() {
        let filter = ChapterFilter::new(&state, false, &downloads);
        let once = filter.apply(&chapters);
        let twice = filter.apply(once.iter().copied());
        assert_eq!(ids(&once), ids(&twice), "{state:?}");
    }
}

#[test]
fn include_and_exclude_partition_the_input() {
    let chapters = sample_chapters();
    let downloads: DownloadIndex = [101, 104].into_iter().collect();
    let cases: [fn(TriState) -> MangaFilterState; 3] = [
        |s| MangaFilterState {
            unread: s,
            ..Default::default()
        },
        |s| MangaFilterState {
            bookmarked: s,
            ..Default::default()
        },
        |s| MangaFilterState {
            downloaded: s,
            ..Default::default()
        },
    ];
    for make in cases {
        let include = make(TriState::Include);
        let exclude = make(TriState::Exclude);
        let kept_in = ids(&ChapterFilter::new(&include, false, &downloads).apply(&chapters));
        let kept_out = ids(&ChapterFilter::new(&exclude, false, &downloads).apply(&chapters));

        assert!(kept_in.iter().all(|id| !kept_out.contains(id)));
        let mut union: Vec<i64> = kept_in.iter().chain(&kept_out).copied().collect();
        union.sort_unstable();
        assert_eq!(union, chapters.iter().map(|c| c.id).collect::<Vec<_>>());
    }
}

#[test]
fn sort_is_stable_for_every_field_and_direction() {
    let mut chapters = sample_chapters();
    // Force equal primary keys.
    for c in &mut chapters {
        c.chapter_number = 1.0;
        c.name = "Same".to_owned();
    }
    for field in [SortField::Source, SortField::Number, SortField::UploadDate, SortField::Alphabet] {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let spec = SortSpec::new(field, direction);
            let view = chapter_view(&chapters, &MangaFilterState::default(), &spec, false, &NoDownloads);
            let orders: Vec<i64> = view.iter().map(|c| c.source_order).collect();
            if field == SortField::Source {
                let mut expected: Vec<i64> = (0..12).collect();
                if direction == SortDirection::Ascending {
                    expected.reverse();
                }
                assert_eq!(orders, expected);
            } else {
                assert_eq!(orders, (0..12).collect::<Vec<_>>(), "{field} {direction:?}");
            }
        }
    }
}

#[test]
fn view_never_mutates_the_input() {
    let chapters = sample_chapters();
    let before = chapters.clone();
    for state in filter_states() {
        let spec = SortSpec::new(SortField::Number, SortDirection::Ascending);
        let _ = chapter_view(&chapters, &state, &spec, false, &NoDownloads);
    }
    assert_eq!(chapters, before);
}

#[test]
fn local_manga_pass_downloaded_include() {
    let chapters = sample_chapters();
    let settings = MangaChapterSettings {
        filter: MangaFilterState {
            downloaded: TriState::Include,
            ..Default::default()
        },
        sort: SortSpec::default(),
    };
    let local = Manga::new(1, LOCAL_SOURCE_ID, "Local", "Local").with_chapter_settings(settings.clone());
    assert_eq!(local.chapter_view(&chapters, &NoDownloads).len(), chapters.len());

    let downloads: DownloadIndex = [105].into_iter().collect();
    let remote = Manga::new(1, 77, "Remote", "/r").with_chapter_settings(settings);
    assert_eq!(ids(&remote.chapter_view(&chapters, &downloads)), vec![105]);
}

#[test]
fn filters_then_sorts_by_number() {
    let chapters = sample_chapters();
    let state = MangaFilterState {
        unread: TriState::Include,
        bookmarked: TriState::Exclude,
        scanlators: BTreeSet::from(["GroupC".to_owned(), "Tom & Jerry".to_owned()]),
        ..Default::default()
    };
    let spec = SortSpec::new(SortField::Number, SortDirection::Ascending);
    let view = chapter_view(&chapters, &state, &spec, false, &NoDownloads);
    // Unread: odd i. Not bookmarked: i % 3 != 0. Credited to C or T&J: i % 4 in {1, 3}.
    // Survivors: i = 1, 5, 7, 11; ascending number = descending i.
    assert_eq!(ids(&view), vec![111, 107, 105, 101]);
}
