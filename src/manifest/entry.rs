//! Manifest entry type and tolerant manifest parsing.

use crate::log;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One content item in `recipes-list.json`.
///
/// ```json
/// { "id": "apple-pie", "title": "Apple Pie", "file": "apple-pie.html" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// File name without extension; used as the URL hash.
    pub id: String,

    /// Human-readable title.
    pub title: String,

    /// Content file, relative to the `blog/` folder.
    pub file: String,

    /// Optional tags, rendered as badges next to the title.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ManifestEntry {
    /// First character of the title, uppercased. `None` for an empty title.
    pub fn initial(&self) -> Option<char> {
        self.title.chars().next().and_then(|c| c.to_uppercase().next())
    }
}

/// Loose shape used while reading a fetched manifest.
///
/// Every field is optional so a single malformed object costs one entry,
/// not the whole list.
#[derive(Deserialize)]
struct RawEntry {
    id: Option<String>,
    title: Option<String>,
    file: Option<String>,
    tags: Option<Vec<String>>,
}

/// Parse a manifest body.
///
/// Fails only when the body is not a JSON array. Objects without `id` or
/// `file` are skipped, a missing `title` becomes empty, and repeated ids keep
/// their first occurrence.
pub fn parse_manifest(body: &str) -> serde_json::Result<Vec<ManifestEntry>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(body)?;

    let entries = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<RawEntry>(value) {
            Ok(RawEntry {
                id: Some(id),
                file: Some(file),
                title,
                tags,
            }) => Some(ManifestEntry {
                id,
                title: title.unwrap_or_default(),
                file,
                tags: tags.unwrap_or_default(),
            }),
            Ok(_) => {
                log!("warn"; "manifest entry #{index} has no id or file, skipped");
                None
            }
            Err(err) => {
                log!("warn"; "manifest entry #{index} is malformed ({err}), skipped");
                None
            }
        })
        .collect();

    Ok(dedupe_ids(entries))
}

/// Keep the first entry for every id.
fn dedupe_ids(entries: Vec<ManifestEntry>) -> Vec<ManifestEntry> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|entry| {
            let fresh = seen.insert(entry.id.clone());
            if !fresh {
                log!("warn"; "duplicate manifest id `{}`, keeping the first", entry.id);
            }
            fresh
        })
        .collect()
}
