//! CLI binary for tsundoku.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tsundoku::chapter::{
    available_scanlators, missing_chapters_count, next_unread, SortDirection, SortField, TriState,
};
use tsundoku::download::NoDownloads;
use tsundoku::{GlobalSearch, LibraryConfig, LocalSource, SearchItemResult, SourcePreferences, SourceRegistry};

/// Manga library tools: search sources, list chapters.
#[derive(Parser)]
#[command(name = "tsundoku", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Local library root, overriding the configured one.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search every enabled source.
    Search {
        /// Text to search for.
        query: String,
        /// Search pinned sources only.
        #[arg(long)]
        pinned_only: bool,
    },

    /// Show a local manga's chapters, filtered and sorted.
    Chapters {
        /// Manga directory name under the library root.
        manga: String,
        /// Unread filter: include, exclude or ignore.
        #[arg(long)]
        unread: Option<TriState>,
        /// Bookmarked filter: include, exclude or ignore.
        #[arg(long)]
        bookmarked: Option<TriState>,
        /// Downloaded filter: include, exclude or ignore.
        #[arg(long)]
        downloaded: Option<TriState>,
        /// Sort field: source, number, date or alpha.
        #[arg(long)]
        sort: Option<SortField>,
        /// Sort descending (newest first).
        #[arg(long, conflicts_with = "asc")]
        desc: bool,
        /// Sort ascending (oldest first).
        #[arg(long)]
        asc: bool,
        /// Only chapters credited to this group (repeatable).
        #[arg(long = "scanlator")]
        scanlators: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tsundoku=info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(LibraryConfig::default_config_path);
    let mut config = if cli.config.is_some() {
        LibraryConfig::from_file(&config_path)?
    } else {
        LibraryConfig::load_or_default(&config_path)?
    };
    if let Some(root) = cli.root {
        config.library.root_dir = Some(root);
    }
    config.validate()?;

    match cli.command {
        Command::Search { query, pinned_only } => run_search(config, &query, pinned_only).await,
        Command::Chapters {
            manga,
            unread,
            bookmarked,
            downloaded,
            sort,
            desc,
            asc,
            scanlators,
        } => {
            let mut settings = config.library.default_chapter_settings.clone();
            if let Some(state) = unread {
                settings.filter.unread = state;
            }
            if let Some(state) = bookmarked {
                settings.filter.bookmarked = state;
            }
            if let Some(state) = downloaded {
                settings.filter.downloaded = state;
            }
            if !scanlators.is_empty() {
                settings.filter.scanlators = scanlators.into_iter().collect::<BTreeSet<_>>();
            }
            if let Some(field) = sort {
                settings.sort.field = field;
            }
            if desc {
                settings.sort.direction = SortDirection::Descending;
            } else if asc {
                settings.sort.direction = SortDirection::Ascending;
            }
            run_chapters(&config, &manga, settings).await
        }
    }
}

async fn run_search(config: LibraryConfig, query: &str, pinned_only: bool) -> anyhow::Result<()> {
    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(LocalSource::new(config.local_root())));

    let store = config.into_preferences()?;
    let prefs = SourcePreferences::new(store);
    if pinned_only {
        prefs.pinned_only().set(&true)?;
    }
    let search = GlobalSearch::new(Arc::new(registry), prefs, config.search_config())?;

    let mut updates = search.subscribe();
    let run_id = search.search(query);
    loop {
        {
            let state = updates.borrow_and_update();
            if state.run_id() == run_id {
                eprintln!("searching... {}/{}", state.progress(), state.total());
                if state.phase().is_terminal() {
                    break;
                }
            }
        }
        if updates.changed().await.is_err() {
            break;
        }
    }

    let state = search.snapshot();
    if state.total() == 0 {
        println!("No sources to search.");
        return Ok(());
    }
    for (entry, result) in search.visible_items(&state) {
        match result {
            SearchItemResult::Success(results) if results.is_empty() => {
                println!("{} ({}): no results", entry.name, entry.lang);
            }
            SearchItemResult::Success(results) => {
                println!("{} ({}): {} results", entry.name, entry.lang, results.len());
                for manga in results {
                    match &manga.link {
                        Some(link) => println!("  - {} <{link}>", manga.title),
                        None => println!("  - {}", manga.title),
                    }
                }
            }
            SearchItemResult::Error(e) => println!("{} ({}): error: {e}", entry.name, entry.lang),
            SearchItemResult::Loading => println!("{} ({}): still loading", entry.name, entry.lang),
        }
    }
    Ok(())
}

async fn run_chapters(
    config: &LibraryConfig,
    manga_dir: &str,
    settings: tsundoku::MangaChapterSettings,
) -> anyhow::Result<()> {
    let source = LocalSource::new(config.local_root());
    let manga = source.manga(0, manga_dir).await?.with_chapter_settings(settings);
    let chapters = source.chapters(&manga).await?;
    let view = manga.chapter_view(&chapters, &NoDownloads);

    println!(
        "{}: {} of {} chapters (sort: {}, {:?})",
        manga.title,
        view.len(),
        chapters.len(),
        manga.chapter_settings.sort.field,
        manga.chapter_settings.sort.direction,
    );
    for chapter in &view {
        let marker = if chapter.read { " " } else { "*" };
        println!("{marker} {}", chapter.name);
    }

    if let Some(next) = next_unread(&view, &manga.chapter_settings.sort) {
        println!("\nNext unread: {}", next.name);
    }
    let missing = missing_chapters_count(&chapters);
    if missing > 0 {
        println!("Missing chapters: {missing}");
    }
    let groups = available_scanlators(&chapters);
    if !groups.is_empty() {
        println!("Scanlators: {}", groups.into_iter().collect::<Vec<_>>().join(", "));
    }
    Ok(())
}
