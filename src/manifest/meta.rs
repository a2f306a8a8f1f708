//! Title and tag extraction from content markup.
//!
//! Content files are HTML fragments, so this is a best-effort scan rather
//! than a parse: the first `<title>` (or `<h1>`) wins, and tags come from a
//! `<meta name="keywords">` element.

use regex::Regex;
use std::sync::LazyLock;

/// Metadata found in a content file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContentMeta {
    pub title: Option<String>,
    pub tags: Vec<String>,
}

static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").unwrap());
static RE_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1\s*>").unwrap());
static RE_META: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").unwrap());
static RE_NAME_KEYWORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bname\s*=\s*["']?keywords["']?"#).unwrap());
static RE_CONTENT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Scan `markup` for a title and keyword tags.
pub fn extract_meta(markup: &str) -> ContentMeta {
    ContentMeta {
        title: extract_title(markup),
        tags: extract_keywords(markup),
    }
}

fn extract_title(markup: &str) -> Option<String> {
    [&*RE_TITLE, &*RE_H1]
        .into_iter()
        .filter_map(|re| re.captures(markup))
        .map(|caps| collapse_text(&RE_TAG.replace_all(&caps[1], "")))
        .find(|title| !title.is_empty())
}

fn extract_keywords(markup: &str) -> Vec<String> {
    let Some(element) = RE_META
        .find_iter(markup)
        .map(|m| m.as_str())
        .find(|element| RE_NAME_KEYWORDS.is_match(element))
    else {
        return Vec::new();
    };

    let Some(caps) = RE_CONTENT_ATTR.captures(element) else {
        return Vec::new();
    };
    let content = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());

    content
        .split(',')
        .map(collapse_text)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Decode the handful of entities hand-written fragments actually use.
///
/// `&amp;` goes last so `&amp;lt;` stays `&lt;`.
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Decode entities and collapse whitespace runs.
fn collapse_text(text: &str) -> String {
    decode_entities(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
