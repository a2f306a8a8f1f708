//! The single state object behind the browser.
//!
//! Fields are only written by the transitions in `controller`; everything
//! else reads through the accessors here.

use super::{cache::ContentCache, entries::visible_entries};
use crate::{
    fetch::{FetchError, LoadStatus},
    manifest::ManifestEntry,
};
use std::{collections::HashSet, sync::Arc};

/// Which list the list view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Every entry.
    #[default]
    Home,
    /// Alphabet navigation; entries appear once a letter is picked.
    Index,
}

/// What occupies the main area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    List,
    Detail { id: String, content: Detail },
}

/// Progress of the content shown in the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// Waiting for `file`, opened under navigation `token`.
    Loading { file: String, token: u64 },
    Ready { file: String, content: Arc<str> },
    Failed { file: String, error: FetchError },
}

pub struct ViewState {
    /// Sorted by title once loaded.
    pub(super) entries: Vec<ManifestEntry>,
    /// Initials present in `entries`.
    pub(super) letters: Vec<char>,
    pub(super) mode: DisplayMode,
    pub(super) letter: Option<char>,
    /// Current location hash, without the leading `#`, percent-decoded.
    pub(super) hash: String,
    pub(super) view: View,
    pub(super) cache: ContentCache,
    pub(super) in_flight: HashSet<String>,
    /// Bumped on every route; a response renders only under the token it was
    /// requested with.
    pub(super) token: u64,
    pub(super) status: Option<LoadStatus>,
}

impl ViewState {
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub const fn selected_letter(&self) -> Option<char> {
        self.letter
    }

    pub const fn view(&self) -> &View {
        &self.view
    }

    /// Manifest load problem to show above the list, if any.
    pub fn status(&self) -> Option<&LoadStatus> {
        self.status.as_ref()
    }

    pub fn is_cached(&self, file: &str) -> bool {
        self.cache.contains(file)
    }

    pub fn is_fetching(&self, file: &str) -> bool {
        self.in_flight.contains(file)
    }

    /// Entry lookup by id, the same lookup a hash goes through.
    pub fn find(&self, id: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries the list view shows for the current mode and letter.
    pub fn visible(&self) -> Vec<&ManifestEntry> {
        visible_entries(&self.entries, self.mode, self.letter)
    }
}
