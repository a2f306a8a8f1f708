//! Pure list operations over manifest entries: ordering, the alphabet, and
//! the letter filter.

use super::state::DisplayMode;
use crate::manifest::ManifestEntry;

/// Sort entries by title the way a reader expects: accents folded, case
/// ignored. Raw title and then id break ties so the order is total.
pub fn sort_by_title(entries: &mut [ManifestEntry]) {
    entries.sort_by_cached_key(|entry| {
        (
            collation_key(&entry.title),
            entry.title.clone(),
            entry.id.clone(),
        )
    });
}

fn collation_key(title: &str) -> String {
    deunicode::deunicode(title).to_lowercase()
}

/// Distinct uppercased initials present in `entries`, in alphabetical order.
///
/// Only initials that have at least one entry are returned, so every
/// rendered letter leads somewhere.
pub fn initials(entries: &[ManifestEntry]) -> Vec<char> {
    let mut letters: Vec<char> = entries.iter().filter_map(ManifestEntry::initial).collect();
    letters.sort_unstable_by_key(|c| (collation_key(&c.to_string()), *c));
    letters.dedup();
    letters
}

/// The list shown for a display mode and letter selection.
///
/// Home shows everything; Index shows nothing until a letter is picked, then
/// the entries whose initial matches, in the established order.
pub fn visible_entries(
    entries: &[ManifestEntry],
    mode: DisplayMode,
    letter: Option<char>,
) -> Vec<&ManifestEntry> {
    match (mode, letter) {
        (DisplayMode::Home, _) => entries.iter().collect(),
        (DisplayMode::Index, None) => Vec::new(),
        (DisplayMode::Index, Some(letter)) => entries
            .iter()
            .filter(|entry| entry.initial() == Some(letter))
            .collect(),
    }
}
