//! Event dispatch for [`ViewState`].
//!
//! `handle` is the only way state changes. It never performs I/O: fetching
//! content and updating the address bar are returned as [`Command`]s for the
//! driver to carry out, and fetch results come back as
//! [`Event::ContentFetched`].

use super::{
    cache::ContentCache,
    entries::{initials, sort_by_title},
    state::{Detail, DisplayMode, View, ViewState},
};
use crate::{
    fetch::{FetchError, ManifestLoad},
    log,
};
use std::{collections::HashSet, sync::Arc};

/// Something that happened in the UI or on the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The manifest finished loading; `hash` is the location at page load.
    Load { manifest: ManifestLoad, hash: String },
    HomeClicked,
    IndexClicked,
    LetterClicked(char),
    /// An entry link, by id.
    EntryClicked(String),
    /// The location hash changed, with or without the leading `#`.
    HashChanged(String),
    BackClicked,
    ContentFetched {
        file: String,
        result: Result<String, FetchError>,
    },
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch `{base}/blog/{file}` and report back with
    /// [`Event::ContentFetched`].
    Fetch { file: String },
    /// Reflect the new hash (no leading `#`, empty to clear) in the location.
    SetHash(String),
}

impl ViewState {
    /// Empty state before the manifest arrives.
    pub fn new(cache_capacity: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            letters: Vec::new(),
            mode: DisplayMode::Home,
            letter: None,
            hash: String::new(),
            view: View::List,
            cache: ContentCache::with_capacity(cache_capacity),
            in_flight: HashSet::new(),
            token: 0,
            status: None,
        }
    }

    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        let mut commands = Vec::new();

        match event {
            Event::Load { manifest, hash } => {
                self.load(manifest);
                self.hash = normalize_hash(&hash);
                self.route(&mut commands);
            }
            Event::HomeClicked => self.show_list(DisplayMode::Home, &mut commands),
            Event::IndexClicked => self.show_list(DisplayMode::Index, &mut commands),
            Event::LetterClicked(letter) => self.toggle_letter(letter),
            Event::EntryClicked(id) => self.navigate(&id, &mut commands),
            Event::HashChanged(hash) => {
                let hash = normalize_hash(&hash);
                if hash != self.hash {
                    self.hash = hash;
                    self.route(&mut commands);
                }
            }
            Event::BackClicked => self.navigate("", &mut commands),
            Event::ContentFetched { file, result } => self.content_fetched(file, result),
        }

        commands
    }

    fn load(&mut self, manifest: ManifestLoad) {
        let ManifestLoad {
            mut entries,
            status,
        } = manifest;
        sort_by_title(&mut entries);
        self.letters = initials(&entries);
        self.entries = entries;
        self.status = status;
    }

    fn show_list(&mut self, mode: DisplayMode, commands: &mut Vec<Command>) {
        self.mode = mode;
        self.letter = None;
        self.navigate("", commands);
    }

    fn toggle_letter(&mut self, letter: char) {
        let Some(letter) = letter.to_uppercase().next() else {
            return;
        };
        let listing_index = self.mode == DisplayMode::Index && self.view == View::List;
        if !listing_index || !self.letters.contains(&letter) {
            return;
        }

        self.letter = if self.letter == Some(letter) {
            None
        } else {
            Some(letter)
        };
    }

    /// Set the hash as a link would, then route to it.
    fn navigate(&mut self, hash: &str, commands: &mut Vec<Command>) {
        let hash = normalize_hash(hash);
        if hash != self.hash {
            commands.push(Command::SetHash(hash.clone()));
            self.hash = hash;
        }
        self.route(commands);
    }

    /// Show whatever the current hash points at.
    fn route(&mut self, commands: &mut Vec<Command>) {
        self.token = self.token.wrapping_add(1);

        if self.hash.is_empty() {
            self.view = View::List;
            return;
        }

        let Some(entry) = self.find(&self.hash) else {
            log!("warn"; "no recipe with id `{}`, showing home", self.hash);
            self.mode = DisplayMode::Home;
            self.letter = None;
            self.view = View::List;
            return;
        };
        let id = entry.id.clone();
        let file = entry.file.clone();

        let content = match self.cache.get(&file) {
            Some(content) => Detail::Ready { file, content },
            None => {
                if self.in_flight.insert(file.clone()) {
                    commands.push(Command::Fetch { file: file.clone() });
                }
                Detail::Loading {
                    file,
                    token: self.token,
                }
            }
        };
        self.view = View::Detail { id, content };
    }

    fn content_fetched(&mut self, file: String, result: Result<String, FetchError>) {
        self.in_flight.remove(&file);

        let waiting = matches!(
            &self.view,
            View::Detail { content: Detail::Loading { file: pending, token }, .. }
                if *pending == file && *token == self.token
        );

        let detail = match result {
            Ok(body) => {
                let content: Arc<str> = Arc::from(body);
                self.cache.insert(file.clone(), Arc::clone(&content));
                Detail::Ready { file, content }
            }
            Err(error) => {
                log!("error"; "loading {file}: {error}");
                Detail::Failed { file, error }
            }
        };

        if waiting && let View::Detail { content, .. } = &mut self.view {
            *content = detail;
        }
    }
}

/// `#a%20b` -> `a b`. Undecodable input is kept as written.
fn normalize_hash(hash: &str) -> String {
    let raw = hash.strip_prefix('#').unwrap_or(hash);
    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), |decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fetch::LoadStatus, manifest::ManifestEntry};
    use std::collections::HashMap;

    fn entry(id: &str, title: &str) -> ManifestEntry {
        ManifestEntry {
            id: id.to_owned(),
            title: title.to_owned(),
            file: format!("{id}.html"),
            tags: vec![],
        }
    }

    fn manifest() -> ManifestLoad {
        ManifestLoad {
            entries: vec![
                entry("apple-pie", "Apple Pie"),
                entry("banana-bread", "Banana Bread"),
                entry("apricot-jam", "Apricot Jam"),
            ],
            status: None,
        }
    }

    /// Drives a [`ViewState`] the way a browser would: `SetHash` is applied
    /// to a fake location and fetches are answered from a fixed map, counting
    /// every request.
    struct Harness {
        state: ViewState,
        location: String,
        pages: HashMap<String, Result<String, FetchError>>,
        fetches: HashMap<String, usize>,
        pending: Vec<String>,
    }

    impl Harness {
        fn new(hash: &str) -> Self {
            let pages = manifest()
                .entries
                .iter()
                .map(|e| (e.file.clone(), Ok(format!("<h1>{}</h1>", e.title))))
                .collect();
            let mut harness = Self {
                state: ViewState::new(None),
                location: hash.to_owned(),
                pages,
                fetches: HashMap::new(),
                pending: Vec::new(),
            };
            harness.send(Event::Load {
                manifest: manifest(),
                hash: hash.to_owned(),
            });
            harness
        }

        /// Dispatch without answering fetches.
        fn send(&mut self, event: Event) {
            for command in self.state.handle(event) {
                match command {
                    Command::Fetch { file } => {
                        *self.fetches.entry(file.clone()).or_default() += 1;
                        self.pending.push(file);
                    }
                    Command::SetHash(hash) => self.location = hash,
                }
            }
        }

        /// Answer the oldest outstanding fetch.
        fn complete_next(&mut self) {
            let file = self.pending.remove(0);
            let result = self
                .pages
                .get(&file)
                .cloned()
                .unwrap_or(Err(FetchError::Status(404)));
            self.send(Event::ContentFetched { file, result });
        }

        fn complete_all(&mut self) {
            while !self.pending.is_empty() {
                self.complete_next();
            }
        }

        fn visible_titles(&self) -> Vec<&str> {
            self.state.visible().iter().map(|e| e.title.as_str()).collect()
        }

        fn fetch_count(&self, file: &str) -> usize {
            self.fetches.get(file).copied().unwrap_or(0)
        }
    }

    fn detail(state: &ViewState) -> (&str, &Detail) {
        match state.view() {
            View::Detail { id, content } => (id, content),
            View::List => panic!("expected detail view"),
        }
    }

    #[test]
    fn test_empty_hash_shows_home_sorted() {
        let h = Harness::new("");
        assert_eq!(h.state.mode(), DisplayMode::Home);
        assert_eq!(h.state.view(), &View::List);
        assert_eq!(h.visible_titles(), ["Apple Pie", "Apricot Jam", "Banana Bread"]);
        assert_eq!(h.state.letters(), ['A', 'B']);
    }

    #[test]
    fn test_letter_toggle() {
        let mut h = Harness::new("");
        h.send(Event::IndexClicked);
        assert!(h.visible_titles().is_empty());

        h.send(Event::LetterClicked('A'));
        assert_eq!(h.state.selected_letter(), Some('A'));
        assert_eq!(h.visible_titles(), ["Apple Pie", "Apricot Jam"]);

        h.send(Event::LetterClicked('A'));
        assert_eq!(h.state.selected_letter(), None);
        assert!(h.visible_titles().is_empty());

        h.send(Event::LetterClicked('b'));
        assert_eq!(h.visible_titles(), ["Banana Bread"]);
    }

    #[test]
    fn test_absent_letter_ignored() {
        let mut h = Harness::new("");
        h.send(Event::IndexClicked);
        h.send(Event::LetterClicked('A'));
        h.send(Event::LetterClicked('Z'));
        assert_eq!(h.state.selected_letter(), Some('A'));
    }

    #[test]
    fn test_letter_ignored_outside_index() {
        let mut h = Harness::new("");
        h.send(Event::LetterClicked('A'));
        assert_eq!(h.state.selected_letter(), None);
        assert_eq!(h.visible_titles().len(), 3);
    }

    #[test]
    fn test_home_and_index_reset_letter() {
        let mut h = Harness::new("");
        h.send(Event::IndexClicked);
        h.send(Event::LetterClicked('B'));
        h.send(Event::HomeClicked);
        assert_eq!(h.state.selected_letter(), None);

        h.send(Event::IndexClicked);
        assert_eq!(h.state.mode(), DisplayMode::Index);
        assert_eq!(h.state.selected_letter(), None);
    }

    #[test]
    fn test_entry_click_sets_hash_and_fetches_once() {
        let mut h = Harness::new("");
        h.send(Event::EntryClicked("banana-bread".into()));

        assert_eq!(h.location, "banana-bread");
        assert_eq!(h.state.hash, "banana-bread");
        assert_eq!(h.fetch_count("banana-bread.html"), 1);
        assert!(matches!(detail(&h.state).1, Detail::Loading { .. }));

        h.complete_all();
        let (id, content) = detail(&h.state);
        assert_eq!(id, "banana-bread");
        assert_eq!(
            content,
            &Detail::Ready {
                file: "banana-bread.html".into(),
                content: Arc::from("<h1>Banana Bread</h1>"),
            }
        );
    }

    #[test]
    fn test_cached_content_is_not_fetched_again() {
        let mut h = Harness::new("#apple-pie");
        h.complete_all();

        h.send(Event::BackClicked);
        assert_eq!(h.location, "");
        assert_eq!(h.state.view(), &View::List);

        h.send(Event::EntryClicked("apple-pie".into()));
        assert_eq!(h.fetch_count("apple-pie.html"), 1);
        assert!(matches!(detail(&h.state).1, Detail::Ready { .. }));
    }

    #[test]
    fn test_in_flight_fetch_is_shared() {
        let mut h = Harness::new("");
        h.send(Event::EntryClicked("apple-pie".into()));
        h.send(Event::BackClicked);
        h.send(Event::EntryClicked("apple-pie".into()));
        assert_eq!(h.fetch_count("apple-pie.html"), 1);

        h.complete_all();
        assert!(matches!(detail(&h.state).1, Detail::Ready { .. }));
    }

    #[test]
    fn test_stale_response_is_cached_but_not_rendered() {
        let mut h = Harness::new("");
        h.send(Event::EntryClicked("apple-pie".into()));
        h.send(Event::EntryClicked("banana-bread".into()));

        // Apple pie arrives while banana bread is on screen
        h.complete_next();
        let (id, content) = detail(&h.state);
        assert_eq!(id, "banana-bread");
        assert!(matches!(content, Detail::Loading { .. }));
        assert!(h.state.is_cached("apple-pie.html"));

        h.complete_next();
        assert!(matches!(detail(&h.state).1, Detail::Ready { file, .. } if file == "banana-bread.html"));

        h.send(Event::HashChanged("#apple-pie".into()));
        assert_eq!(h.fetch_count("apple-pie.html"), 1);
        assert!(matches!(detail(&h.state).1, Detail::Ready { file, .. } if file == "apple-pie.html"));
    }

    #[test]
    fn test_response_after_leaving_detail_keeps_list() {
        let mut h = Harness::new("");
        h.send(Event::IndexClicked);
        h.send(Event::EntryClicked("apple-pie".into()));
        h.send(Event::BackClicked);
        h.complete_all();

        assert_eq!(h.state.view(), &View::List);
        assert_eq!(h.state.mode(), DisplayMode::Index);
    }

    #[test]
    fn test_hash_resolves_like_lookup() {
        let h = Harness::new("#apricot-jam");
        let (id, content) = detail(&h.state);
        let found = h.state.find("apricot-jam").unwrap();
        assert_eq!(id, found.id);
        assert!(matches!(content, Detail::Loading { file, .. } if *file == found.file));
    }

    #[test]
    fn test_percent_encoded_hash() {
        let mut h = Harness::new("");
        h.state.entries.push(entry("mom's pie", "Mom's Pie"));
        h.send(Event::HashChanged("#mom's%20pie".into()));
        assert_eq!(detail(&h.state).0, "mom's pie");
    }

    #[test]
    fn test_unknown_hash_falls_back_to_home() {
        let mut h = Harness::new("");
        h.send(Event::IndexClicked);
        h.send(Event::LetterClicked('A'));
        h.send(Event::HashChanged("#no-such-recipe".into()));

        assert_eq!(h.state.view(), &View::List);
        assert_eq!(h.state.mode(), DisplayMode::Home);
        assert_eq!(h.state.selected_letter(), None);
        assert_eq!(h.visible_titles().len(), 3);
        assert!(h.fetches.is_empty());
    }

    #[test]
    fn test_empty_hash_rerenders_current_list() {
        let mut h = Harness::new("");
        h.send(Event::IndexClicked);
        h.send(Event::LetterClicked('B'));
        h.send(Event::HashChanged("#banana-bread".into()));
        h.send(Event::HashChanged(String::new()));

        assert_eq!(h.state.view(), &View::List);
        assert_eq!(h.visible_titles(), ["Banana Bread"]);
    }

    #[test]
    fn test_fetch_failure_renders_inline_and_keeps_navigation() {
        let mut h = Harness::new("");
        h.pages.insert("apple-pie.html".into(), Err(FetchError::Timeout));
        h.send(Event::EntryClicked("apple-pie".into()));
        h.complete_all();

        let (id, content) = detail(&h.state);
        assert_eq!(id, "apple-pie");
        assert_eq!(
            content,
            &Detail::Failed {
                file: "apple-pie.html".into(),
                error: FetchError::Timeout
            }
        );
        assert_eq!(h.state.hash, "apple-pie");
        assert!(!h.state.is_cached("apple-pie.html"));
    }

    #[test]
    fn test_content_passes_through_verbatim() {
        let mut h = Harness::new("");
        let body = "<script>alert(1)</script>\r\n\x1b[31m  spaced  \u{00e9}";
        h.pages.insert("apple-pie.html".into(), Ok(body.into()));
        h.send(Event::EntryClicked("apple-pie".into()));
        h.complete_all();

        match detail(&h.state).1 {
            Detail::Ready { content, .. } => assert_eq!(&**content, body),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_manifest_not_found_is_empty_home() {
        let mut state = ViewState::new(None);
        let commands = state.handle(Event::Load {
            manifest: ManifestLoad {
                entries: vec![],
                status: Some(LoadStatus::NotDeployed),
            },
            hash: "#apple-pie".into(),
        });

        assert!(commands.is_empty());
        assert!(state.entries().is_empty());
        assert!(state.letters().is_empty());
        assert_eq!(state.view(), &View::List);
        assert_eq!(state.status(), Some(&LoadStatus::NotDeployed));
    }

    #[test]
    fn test_bounded_cache_refetches_evicted() {
        let mut h = Harness::new("");
        h.state = ViewState::new(Some(1));
        h.send(Event::Load {
            manifest: manifest(),
            hash: String::new(),
        });

        h.send(Event::EntryClicked("apple-pie".into()));
        h.complete_all();
        h.send(Event::EntryClicked("banana-bread".into()));
        h.complete_all();
        h.send(Event::EntryClicked("apple-pie".into()));

        assert_eq!(h.fetch_count("apple-pie.html"), 2);
    }
}
