//! Scanlator group tokens and the allow-list check.

use std::collections::BTreeSet;

use super::model::Chapter;

/// Separator between credited groups in a chapter's scanlator field.
pub const SCANLATOR_DELIMITER: char = ',';

/// Split a scanlator field into trimmed, non-empty group names.
pub fn scanlator_tokens(field: &str) -> impl Iterator<Item = &str> {
    field
        .split(SCANLATOR_DELIMITER)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Allow-list check. An empty allow-list lets everything through; otherwise
/// at least one group of the chapter has to be listed.
pub fn passes_allow_list(scanlator: Option<&str>, allowed: &BTreeSet<String>) -> bool {
    if allowed.is_empty() {
        return true;
    }
    scanlator.is_some_and(|field| scanlator_tokens(field).any(|t| allowed.contains(t)))
}

/// Distinct groups credited across `chapters`, sorted.
pub fn available_scanlators<'c>(chapters: impl IntoIterator<Item = &'c Chapter>) -> BTreeSet<String> {
    chapters
        .into_iter()
        .filter_map(|c| c.scanlator.as_deref())
        .flat_map(scanlator_tokens)
        .map(str::to_owned)
        .collect()
}
