//! Terminal recipe browser.
//!
//! A line-oriented stand-in for the web page: typed commands play the part of
//! clicks, `#id` plays the part of editing the address bar.
//!
//! # Event Loop
//!
//! ```text
//! ┌──────────────┐   Line    ┌──────────────┐   Fetch    ┌──────────────┐
//! │ stdin thread │──────────▶│  event loop  │───────────▶│ fetch thread │
//! └──────────────┘           │ (ViewState)  │◀───────────│  (per file)  │
//!                            └──────────────┘  Fetched   └──────────────┘
//! ```
//!
//! Everything arrives on one channel and is handled one message at a time,
//! so the view state needs no locking.

use crate::{
    config::SiteConfig,
    fetch::{FetchError, Fetcher, HttpFetcher, ManifestLoad, content_url, load_manifest, manifest_url},
    log,
    manifest::decode_entities,
    view::{
        Command, Event, ViewState,
        render::{self, DetailBody, DetailScreen, ListScreen, Screen},
    },
};
use anyhow::{Context, Result};
use colored::Colorize;
use regex::Regex;
use std::{
    io::{self, BufRead, Write},
    sync::{
        Arc, LazyLock,
        mpsc::{self, Receiver, Sender},
    },
    thread,
    time::Duration,
};

const HELP: &str = "commands: home | index | <letter> | letter <X> | open <id|n> | #<id> | back | list | quit";

/// Browse `browse.base_url` interactively until `quit` or end of input.
pub fn browse_site(config: &SiteConfig, hash: Option<&str>, raw: bool) -> Result<()> {
    let browse = &config.browse;
    let fetcher: Arc<dyn Fetcher> =
        Arc::new(HttpFetcher::new(Duration::from_millis(browse.timeout_ms)));

    log!("browse"; "loading {}", manifest_url(&browse.base_url));
    let manifest = load_manifest(fetcher.as_ref(), &browse.base_url);
    log!("browse"; "{} recipes", manifest.entries.len());

    let (tx, rx) = mpsc::channel();
    spawn_input_reader(tx.clone());

    let mut browser = Browser {
        state: ViewState::new(browse.cache_capacity),
        fetcher,
        base_url: browse.base_url.clone(),
        location: String::new(),
        raw,
        tx,
        out: io::stdout(),
    };

    browser.start(manifest, hash).context("Failed to write to terminal")?;
    browser.run(&rx).context("Failed to write to terminal")
}

// ============================================================================
// Messages
// ============================================================================

enum Message {
    Line(String),
    InputClosed,
    Fetched {
        file: String,
        result: Result<String, FetchError>,
    },
}

fn spawn_input_reader(tx: Sender<Message>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Message::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Message::InputClosed);
    });
}

/// A typed command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Home,
    Index,
    Letter(char),
    /// Entry id, or 1-based position in the list on screen.
    Open(String),
    Hash(String),
    Back,
    List,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if let Some(hash) = line.strip_prefix('#') {
        return Some(Input::Hash(hash.to_owned()));
    }
    if let Some(letter) = single_char(line) {
        return Some(Input::Letter(letter));
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let input = match (word.to_ascii_lowercase().as_str(), rest) {
        ("home", "") => Input::Home,
        ("index", "") => Input::Index,
        ("back", "") => Input::Back,
        ("list", "") => Input::List,
        ("help", "") => Input::Help,
        ("quit" | "exit", "") => Input::Quit,
        ("letter", rest) => Input::Letter(single_char(rest)?),
        ("open", rest) if !rest.is_empty() => Input::Open(rest.to_owned()),
        _ => return None,
    };
    Some(input)
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Some(c),
        _ => None,
    }
}

// ============================================================================
// Browser
// ============================================================================

struct Browser<W: Write> {
    state: ViewState,
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
    /// Hash shown in the header, as the address bar would.
    location: String,
    raw: bool,
    tx: Sender<Message>,
    out: W,
}

impl<W: Write> Browser<W> {
    fn start(&mut self, manifest: ManifestLoad, hash: Option<&str>) -> io::Result<()> {
        let hash = hash.unwrap_or_default();
        self.location = hash.trim_start_matches('#').to_owned();
        writeln!(self.out, "{}", HELP.dimmed())?;
        self.dispatch(Event::Load {
            manifest,
            hash: hash.to_owned(),
        })
    }

    fn run(&mut self, rx: &Receiver<Message>) -> io::Result<()> {
        for message in rx {
            match message {
                Message::Line(line) if line.trim().is_empty() => {}
                Message::Line(line) => match parse_input(&line) {
                    Some(Input::Quit) => break,
                    Some(input) => self.apply(input)?,
                    None => writeln!(self.out, "unknown command `{}`; {HELP}", line.trim())?,
                },
                Message::InputClosed => break,
                Message::Fetched { file, result } => {
                    self.dispatch(Event::ContentFetched { file, result })?;
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, input: Input) -> io::Result<()> {
        let event = match input {
            Input::Home => Event::HomeClicked,
            Input::Index => Event::IndexClicked,
            Input::Letter(letter) => Event::LetterClicked(letter),
            Input::Open(target) => Event::EntryClicked(self.resolve_target(target)),
            Input::Hash(hash) => Event::HashChanged(hash),
            Input::Back => Event::BackClicked,
            Input::List => return self.draw(),
            Input::Help => return writeln!(self.out, "{HELP}"),
            Input::Quit => return Ok(()),
        };
        self.dispatch(event)
    }

    /// An existing id wins; otherwise `open 2` means the second entry on
    /// screen. Anything else is passed on as an id.
    fn resolve_target(&self, target: String) -> String {
        if self.state.find(&target).is_some() {
            return target;
        }
        target
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| self.state.visible().get(index).map(|entry| entry.id.clone()))
            .unwrap_or(target)
    }

    fn dispatch(&mut self, event: Event) -> io::Result<()> {
        for command in self.state.handle(event) {
            match command {
                Command::Fetch { file } => self.spawn_fetch(file),
                Command::SetHash(hash) => self.location = hash,
            }
        }
        self.draw()
    }

    fn spawn_fetch(&self, file: String) {
        let fetcher = Arc::clone(&self.fetcher);
        let url = content_url(&self.base_url, &file);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = fetcher.fetch(&url);
            // The loop is gone once the user quits
            let _ = tx.send(Message::Fetched { file, result });
        });
    }

    fn draw(&mut self) -> io::Result<()> {
        let location = if self.location.is_empty() {
            String::new()
        } else {
            format!("#{}", sanitize(&self.location))
        };
        writeln!(self.out)?;
        let title = format!("── recipes ({})", self.state.entries().len());
        writeln!(self.out, "{} {}", title.bold(), location.dimmed())?;

        let drawn = match render::screen(&self.state) {
            Screen::List(list) => draw_list(&mut self.out, &list, &self.state),
            Screen::Detail(detail) => draw_detail(&mut self.out, &detail, self.raw),
        };
        drawn?;
        self.out.flush()
    }
}

fn draw_list(out: &mut impl Write, list: &ListScreen<'_>, state: &ViewState) -> io::Result<()> {
    if let Some(alphabet) = &list.alphabet {
        let letters: Vec<String> = alphabet
            .iter()
            .map(|link| {
                if link.active {
                    format!("[{}]", link.letter).green().bold().to_string()
                } else {
                    format!(" {} ", link.letter)
                }
            })
            .collect();
        writeln!(out, "{}", letters.join(""))?;
    }

    if let Some(message) = &list.message {
        writeln!(out, "{}", message.yellow())?;
    }

    for (n, entry) in list.entries.iter().enumerate() {
        let mut line = format!("{:>3}. {}", n + 1, sanitize(&entry.title).bold());
        if !entry.tags.is_empty() {
            let tags: Vec<_> = entry.tags.iter().map(|tag| sanitize(tag)).collect();
            line.push_str(&format!("  {}", tags.join(", ").cyan()));
        }
        if state.is_fetching(&entry.file) {
            line.push_str(&format!(" {}", "(loading)".dimmed()));
        } else if state.is_cached(&entry.file) {
            line.push_str(&format!(" {}", "(read)".dimmed()));
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn draw_detail(out: &mut impl Write, detail: &DetailScreen<'_>, raw: bool) -> io::Result<()> {
    if let Some(entry) = detail.entry {
        writeln!(out, "{}", sanitize(&entry.title).bold().underline())?;
    }

    match &detail.body {
        DetailBody::Loading => writeln!(out, "{}", detail.body.text().dimmed())?,
        DetailBody::Error(message) => writeln!(out, "{}", sanitize(message).red())?,
        DetailBody::Content(content) => {
            let text = if raw {
                sanitize(content)
            } else {
                sanitize(&strip_tags(content))
            };
            writeln!(out, "{text}")?;
        }
    }
    writeln!(out, "{}", "(back to return)".dimmed())
}

// ============================================================================
// Text Cleanup
// ============================================================================

static RE_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[[0-?]*[ -/]*[@-~]|\][^\x07\x1b]*(?:\x07|\x1b\\)?|[@-Z\\-_])").unwrap()
});
static RE_HIDDEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").unwrap()
});
static RE_LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").unwrap());
static RE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|h[1-6]|ul|ol|tr|table|section|article|header|footer|blockquote|pre)\s*>").unwrap()
});
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Remove terminal escape sequences and other control characters, keeping
/// newlines and tabs.
fn sanitize(text: &str) -> String {
    RE_ESCAPE
        .replace_all(text, "")
        .chars()
        .filter(|&c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect()
}

/// Markup to readable plain text: block ends become line breaks, list items
/// become dashes, everything else tag-like is dropped.
fn strip_tags(markup: &str) -> String {
    let text = RE_HIDDEN.replace_all(markup, "");
    let text = RE_LIST_ITEM.replace_all(&text, "\n- ");
    let text = RE_BREAK.replace_all(&text, "\n");
    let text = decode_entities(&RE_TAG.replace_all(&text, ""));

    let mut out = String::with_capacity(text.len());
    let mut blank = true;
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !blank {
                out.push('\n');
                blank = true;
            }
            continue;
        }
        out.push_str(line);
        out.push('\n');
        blank = false;
    }
    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestEntry;
    use std::collections::HashMap;

    struct StaticFetcher(HashMap<String, String>);

    impl Fetcher for StaticFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.0.get(url).cloned().ok_or(FetchError::Status(404))
        }
    }

    fn browser(pages: &[(&str, &str)]) -> (Browser<Vec<u8>>, Receiver<Message>) {
        let pages = pages
            .iter()
            .map(|(file, body)| (content_url("http://h/recipe", file), (*body).to_owned()))
            .collect();
        let (tx, rx) = mpsc::channel();
        let browser = Browser {
            state: ViewState::new(None),
            fetcher: Arc::new(StaticFetcher(pages)),
            base_url: "http://h/recipe".into(),
            location: String::new(),
            raw: false,
            tx,
            out: Vec::new(),
        };
        (browser, rx)
    }

    fn manifest() -> ManifestLoad {
        let entry = |id: &str, title: &str| ManifestEntry {
            id: id.into(),
            title: title.into(),
            file: format!("{id}.html"),
            tags: vec![],
        };
        ManifestLoad {
            entries: vec![entry("banana-bread", "Banana Bread"), entry("apple-pie", "Apple Pie")],
            status: None,
        }
    }

    fn take_output(browser: &mut Browser<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(&mut browser.out)).unwrap()
    }

    /// Wait for the fetch thread's answer and feed it to the loop.
    fn deliver_fetch(browser: &mut Browser<Vec<u8>>, rx: &Receiver<Message>) {
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            Message::Fetched { file, result } => browser
                .dispatch(Event::ContentFetched { file, result })
                .unwrap(),
            _ => panic!("expected a fetch result"),
        }
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("home"), Some(Input::Home));
        assert_eq!(parse_input("  Index "), Some(Input::Index));
        assert_eq!(parse_input("a"), Some(Input::Letter('a')));
        assert_eq!(parse_input("letter B"), Some(Input::Letter('B')));
        assert_eq!(parse_input("open 2"), Some(Input::Open("2".into())));
        assert_eq!(parse_input("open apple-pie"), Some(Input::Open("apple-pie".into())));
        assert_eq!(parse_input("#apple-pie"), Some(Input::Hash("apple-pie".into())));
        assert_eq!(parse_input("#"), Some(Input::Hash(String::new())));
        assert_eq!(parse_input("back"), Some(Input::Back));
        assert_eq!(parse_input("quit"), Some(Input::Quit));
    }

    #[test]
    fn test_parse_input_rejects_garbage() {
        assert_eq!(parse_input("open"), None);
        assert_eq!(parse_input("letter AB"), None);
        assert_eq!(parse_input("home now"), None);
        assert_eq!(parse_input("bake"), None);
    }

    #[test]
    fn test_sanitize_strips_escapes() {
        let text = "ok\x1b[2J\x1b[31mred\x1b[0m\x1b]0;title\x07 \x07bell\r\n\tnext";
        assert_eq!(sanitize(text), "okred bell\n\tnext");
    }

    #[test]
    fn test_strip_tags() {
        let markup = "<h1>Apple&nbsp;Pie</h1>\n<script>alert(1)</script>\
                      <p>Bake at 180 &amp; rest.</p><ul><li>flour</li><li>apples</li></ul>";
        assert_eq!(
            strip_tags(markup),
            "Apple Pie\n\nBake at 180 & rest.\n\n- flour\n- apples"
        );
    }

    #[test]
    fn test_open_by_position_and_render_content() {
        let (mut browser, rx) = browser(&[("apple-pie.html", "<p>Bake \x1b[31mwell</p>")]);
        browser.start(manifest(), None).unwrap();
        let listing = take_output(&mut browser);
        let apple = listing.find("Apple Pie").unwrap();
        let banana = listing.find("Banana Bread").unwrap();
        assert!(apple < banana);

        browser.apply(parse_input("open 1").unwrap()).unwrap();
        assert_eq!(browser.location, "apple-pie");
        assert!(take_output(&mut browser).contains(render::LOADING));

        deliver_fetch(&mut browser, &rx);
        let page = take_output(&mut browser);
        assert!(page.contains("Bake well"));
        assert!(!page.contains("<p>"));
    }

    #[test]
    fn test_open_prefers_numeric_id_over_position() {
        let (mut browser, _rx) = browser(&[]);
        let mut manifest = manifest();
        manifest.entries.push(ManifestEntry {
            id: "2".into(),
            title: "Two Bean Chili".into(),
            file: "2.html".into(),
            tags: vec![],
        });
        browser.start(manifest, None).unwrap();

        // Listed as Apple Pie, Banana Bread, Two Bean Chili
        assert_eq!(browser.resolve_target("2".into()), "2");
        assert_eq!(browser.resolve_target("1".into()), "apple-pie");
        assert_eq!(browser.resolve_target("9".into()), "9");
    }

    #[test]
    fn test_read_entries_are_marked() {
        let (mut browser, rx) = browser(&[("apple-pie.html", "<p>pie</p>")]);
        browser.start(manifest(), Some("apple-pie")).unwrap();
        deliver_fetch(&mut browser, &rx);
        browser.apply(Input::Back).unwrap();

        let listing = take_output(&mut browser);
        let apple_line = listing.lines().rev().find(|l| l.contains("Apple Pie")).unwrap();
        let banana_line = listing.lines().rev().find(|l| l.contains("Banana Bread")).unwrap();
        assert!(apple_line.contains("(read)"));
        assert!(!banana_line.contains("(read)"));
        assert!(listing.contains("recipes (2)"));
    }

    #[test]
    fn test_missing_content_shows_inline_error() {
        let (mut browser, rx) = browser(&[]);
        browser.start(manifest(), Some("#banana-bread")).unwrap();
        deliver_fetch(&mut browser, &rx);

        let page = take_output(&mut browser);
        assert!(page.contains("Failed to load recipe: banana-bread.html"));
    }

    #[test]
    fn test_index_letters() {
        let (mut browser, _rx) = browser(&[]);
        browser.start(manifest(), None).unwrap();
        browser.apply(Input::Index).unwrap();
        assert!(take_output(&mut browser).contains(render::PICK_LETTER));

        browser.apply(Input::Letter('b')).unwrap();
        let page = take_output(&mut browser);
        assert!(page.contains("Banana Bread"));
        assert!(!page.contains("Apple Pie"));
    }
}
