//! Presentation model: what to draw for the current state.
//!
//! Nothing here knows about terminals or HTML. A presenter walks the
//! [`Screen`] and draws it however it likes.

use super::state::{Detail, DisplayMode, View, ViewState};
use crate::manifest::ManifestEntry;

pub const EMPTY_HOME: &str = "No recipes found to display.";
pub const PICK_LETTER: &str = "Select a letter above to browse recipes.";
pub const LOADING: &str = "Loading recipe...";

#[derive(Debug, PartialEq, Eq)]
pub enum Screen<'a> {
    List(ListScreen<'a>),
    Detail(DetailScreen<'a>),
}

#[derive(Debug, PartialEq, Eq)]
pub struct ListScreen<'a> {
    pub mode: DisplayMode,
    /// Present in Index mode only.
    pub alphabet: Option<Vec<LetterLink>>,
    pub entries: Vec<&'a ManifestEntry>,
    /// Shown instead of, or above, the entries.
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterLink {
    pub letter: char,
    pub active: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DetailScreen<'a> {
    pub entry: Option<&'a ManifestEntry>,
    pub body: DetailBody<'a>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DetailBody<'a> {
    Loading,
    /// Raw fetched content.
    Content(&'a str),
    Error(String),
}

impl DetailBody<'_> {
    /// Text to show for this body, before any presenter-side cleanup.
    pub fn text(&self) -> &str {
        match self {
            Self::Loading => LOADING,
            Self::Content(content) => content,
            Self::Error(message) => message,
        }
    }
}

pub fn screen(state: &ViewState) -> Screen<'_> {
    match state.view() {
        View::List => Screen::List(list_screen(state)),
        View::Detail { id, content } => Screen::Detail(DetailScreen {
            entry: state.find(id),
            body: detail_body(content),
        }),
    }
}

fn list_screen(state: &ViewState) -> ListScreen<'_> {
    let mode = state.mode();
    let selected = state.selected_letter();
    let entries = state.visible();

    let alphabet = (mode == DisplayMode::Index).then(|| {
        state
            .letters()
            .iter()
            .map(|&letter| LetterLink {
                letter,
                active: selected == Some(letter),
            })
            .collect()
    });

    let empty_message = match (mode, selected) {
        _ if !entries.is_empty() => None,
        (DisplayMode::Home, _) => Some(EMPTY_HOME.to_owned()),
        (DisplayMode::Index, None) => Some(PICK_LETTER.to_owned()),
        (DisplayMode::Index, Some(letter)) => {
            Some(format!("No recipes found starting with '{letter}'."))
        }
    };

    // A failed manifest load explains the empty list better than "no recipes"
    let message = state
        .status()
        .map(|status| status.message())
        .or(empty_message);

    ListScreen {
        mode,
        alphabet,
        entries,
        message,
    }
}

fn detail_body(detail: &Detail) -> DetailBody<'_> {
    match detail {
        Detail::Loading { .. } => DetailBody::Loading,
        Detail::Ready { content, .. } => DetailBody::Content(content),
        Detail::Failed { file, error } => {
            DetailBody::Error(format!("Failed to load recipe: {file} ({error})."))
        }
    }
}
