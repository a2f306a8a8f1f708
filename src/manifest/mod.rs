//! The recipe manifest (`recipes-list.json`).
//!
//! # Format
//!
//! ```json
//! [
//!   {
//!     "id": "tomato-meat-machillo-receipe",
//!     "title": "Tomato Meat Machillo Receipe",
//!     "file": "tomato-meat-machillo-receipe.html"
//!   }
//! ]
//! ```
//!
//! `tags` is optional and omitted when empty.
//!
//! # Modules
//!
//! | Module    | Role                                              |
//! |-----------|---------------------------------------------------|
//! | `entry`   | [`ManifestEntry`] and tolerant parsing            |
//! | `title`   | File stem to display title                        |
//! | `meta`    | `<title>` / keywords scan for `build.meta = true` |
//! | `builder` | Folder scan and manifest writing                  |

mod builder;
mod entry;
mod meta;
mod title;

pub use builder::{BuildOptions, BuildReport, build_manifest};
pub use entry::{ManifestEntry, parse_manifest};
pub use meta::decode_entities;

/// File name of the manifest, relative to the site base URL.
pub const MANIFEST_FILE: &str = "recipes-list.json";

/// Folder holding content files, relative to the site base URL.
pub const CONTENT_FOLDER: &str = "blog";
