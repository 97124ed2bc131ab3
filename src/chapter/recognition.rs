//! Chapter number recognition from chapter names.
//!
//! Handles the common shapes sources use: `"Ch. 12"`, `"Vol.2 Ch.14.5"`,
//! `"Title 567 Subtitle"`, `"Ch.4a"`, `"Ch.4 extra"`. Names without any
//! number yield [`UNKNOWN_CHAPTER_NUMBER`].

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::model::UNKNOWN_CHAPTER_NUMBER;

const NUMBER_PATTERN: &str = r"([0-9]+)(\.[0-9]+)?(\.?[a-z]+)?";

struct Patterns {
    /// Number right after `ch.`.
    basic: Regex,
    /// Any number with optional decimal and alpha suffix.
    number: Regex,
    /// Volume/version/season tags that are not chapter numbers.
    unwanted: Regex,
    /// Whitespace before a suffix word, so the word binds to the number.
    suffix_space: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            basic: Regex::new(&format!(r"ch\. *{NUMBER_PATTERN}"))?,
            number: Regex::new(NUMBER_PATTERN)?,
            unwanted: Regex::new(r"\b(?:v|ver|vol|version|volume|season|s)[^a-z]?[0-9]+")?,
            suffix_space: Regex::new(r"\s(extra|special|omake)")?,
        })
    }
}

fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| match Patterns::compile() {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::error!(error = %e, "chapter recognition patterns failed to compile");
                None
            }
        })
        .as_ref()
}

/// Recognize the chapter number in `chapter_name`.
///
/// The manga title is stripped first so numbers in titles ("Gantz 2") are
/// not mistaken for chapter numbers.
pub fn recognize_chapter_number(manga_title: &str, chapter_name: &str) -> f64 {
    let Some(p) = patterns() else {
        return UNKNOWN_CHAPTER_NUMBER;
    };

    let mut clean = chapter_name.to_lowercase();
    let title = manga_title.trim().to_lowercase();
    if !title.is_empty() {
        clean = clean.replace(&title, "");
    }
    let clean = clean.trim().replace(',', ".").replace('-', ".");
    let clean = p.suffix_space.replace_all(&clean, "$1");

    let mut matches = p.number.captures_iter(&clean);
    let Some(first) = matches.next() else {
        return UNKNOWN_CHAPTER_NUMBER;
    };
    if matches.next().is_none() {
        return number_from(&first);
    }

    let without_tags = p.unwanted.replace_all(&clean, "");
    if let Some(caps) = p.basic.captures(&without_tags) {
        return number_from(&caps);
    }
    if let Some(caps) = p.number.captures(&without_tags) {
        return number_from(&caps);
    }
    number_from(&first)
}

fn number_from(caps: &Captures<'_>) -> f64 {
    let Some(whole) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) else {
        return UNKNOWN_CHAPTER_NUMBER;
    };
    whole + sub_chapter(caps.get(2).map(|m| m.as_str()), caps.get(3).map(|m| m.as_str()))
}

fn sub_chapter(decimal: Option<&str>, alpha: Option<&str>) -> f64 {
    if let Some(decimal) = decimal.filter(|d| !d.is_empty()) {
        return format!("0{decimal}").parse().unwrap_or(0.0);
    }
    let Some(alpha) = alpha.filter(|a| !a.is_empty()) else {
        return 0.0;
    };
    if alpha.contains("extra") {
        return 0.99;
    }
    if alpha.contains("omake") {
        return 0.98;
    }
    if alpha.contains("special") {
        return 0.97;
    }
    let letter = alpha.trim_start_matches('.');
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        // a -> .1 ... i -> .9
        (Some(c @ 'a'..='i'), None) => f64::from(c as u8 - b'a' + 1) / 10.0,
        _ => 0.0,
    }
}
