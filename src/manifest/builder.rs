//! Content folder scan and manifest writing.

use super::{
    entry::ManifestEntry,
    meta::extract_meta,
    title::{strip_extension, title_from_stem},
};
use crate::log;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

/// Index builder errors. All of them are fatal for a build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to list content folder `{0}`")]
    ReadDir(PathBuf, #[source] walkdir::Error),

    #[error("content path `{0}` is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to read content file `{0}`")]
    ReadFile(PathBuf, #[source] io::Error),

    #[error("failed to write manifest `{0}`")]
    Write(PathBuf, #[source] io::Error),

    #[error("failed to serialize manifest")]
    Serialize(#[from] serde_json::Error),
}

/// How content files are recognized and titled.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions<'a> {
    /// Extension without the dot, matched exactly.
    pub extension: &'a str,
    /// Prefer `<title>`/keywords from the markup over the file name.
    pub meta: bool,
}

/// Outcome of a successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub entries: usize,
    pub content_missing: bool,
}

/// Scan `content_dir` and write the manifest to `output`.
///
/// A missing content folder is not an error: the manifest is written as `[]`
/// so the site still deploys before anything is published.
pub fn build_manifest(
    content_dir: &Path,
    output: &Path,
    options: BuildOptions<'_>,
) -> Result<BuildReport, BuildError> {
    let content_missing = !content_dir.exists();
    let entries = if content_missing {
        log!(
            "warn";
            "content folder `{}` not found, writing an empty manifest",
            content_dir.display()
        );
        Vec::new()
    } else {
        collect_entries(content_dir, options)?
    };

    write_manifest(output, &entries)?;

    Ok(BuildReport {
        entries: entries.len(),
        content_missing,
    })
}

/// Build manifest entries for every recognized file directly in `content_dir`,
/// newest first when file names are date-prefixed (descending name order).
pub fn collect_entries(
    content_dir: &Path,
    options: BuildOptions<'_>,
) -> Result<Vec<ManifestEntry>, BuildError> {
    if !content_dir.is_dir() {
        return Err(BuildError::NotADirectory(content_dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(content_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_broken_link(&err) => {
                if let Some(path) = err.path() {
                    log!("warn"; "skipping broken link {}", path.display());
                }
                continue;
            }
            Err(err) => return Err(BuildError::ReadDir(content_dir.to_path_buf(), err)),
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            log!("warn"; "skipping non UTF-8 file name {}", entry.path().display());
            continue;
        };
        if strip_extension(name, options.extension).is_some() {
            files.push(name.to_owned());
        }
    }

    files.sort_unstable_by(|a, b| b.cmp(a));

    files
        .into_iter()
        .map(|file| make_entry(content_dir, file, options))
        .collect()
}

/// A link whose target is missing or unreadable fails only itself.
fn is_broken_link(err: &walkdir::Error) -> bool {
    err.path()
        .and_then(|path| path.symlink_metadata().ok())
        .is_some_and(|meta| meta.file_type().is_symlink())
}

fn make_entry(
    content_dir: &Path,
    file: String,
    options: BuildOptions<'_>,
) -> Result<ManifestEntry, BuildError> {
    // Only names that carry the extension reach this point
    let id = strip_extension(&file, options.extension)
        .unwrap_or(file.as_str())
        .to_owned();
    let mut entry = ManifestEntry {
        title: title_from_stem(&id),
        id,
        file,
        tags: Vec::new(),
    };

    if options.meta {
        let path = content_dir.join(&entry.file);
        let markup = fs::read_to_string(&path).map_err(|err| BuildError::ReadFile(path, err))?;
        let meta = extract_meta(&markup);
        if let Some(title) = meta.title {
            entry.title = title;
        }
        entry.tags = meta.tags;
    }

    Ok(entry)
}

/// Write entries as pretty-printed JSON, creating parent folders as needed.
pub fn write_manifest(output: &Path, entries: &[ManifestEntry]) -> Result<(), BuildError> {
    let json = serde_json::to_string_pretty(entries)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| BuildError::Write(output.to_path_buf(), err))?;
    }
    fs::write(output, json).map_err(|err| BuildError::Write(output.to_path_buf(), err))
}
