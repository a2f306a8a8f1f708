//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// shelf: recipe index builder and terminal browser
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file path (default: shelf.toml, optional)
    #[arg(short = 'C', long, default_value = "shelf.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared index builder arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Directory holding the published content files
    #[arg(short, long, env = "BLOG_CONTENT_FOLDER")]
    pub content: Option<PathBuf>,

    /// Path the JSON manifest is written to
    #[arg(short, long, env = "OUTPUT_INDEX_DB_FILE")]
    pub output: Option<PathBuf>,

    /// Extension of recognized content files (without the dot)
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Read titles and tags from each file's markup instead of its name
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub meta: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan the content folder and write the recipe manifest
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build the manifest, then serve the site for local browsing
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory served under the base path
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// URL prefix the site is mounted at (e.g. `/recipe`)
        #[arg(long = "base-path")]
        base_path: Option<String>,
    },

    /// Browse a deployed recipe site from the terminal
    Browse {
        /// Base URL the manifest and `blog/` folder live under
        #[arg(short, long = "base-url")]
        base_url: Option<String>,

        /// Initial URL hash (entry id), as if opened from a direct link
        #[arg(long)]
        hash: Option<String>,

        /// Per-request timeout in milliseconds
        #[arg(short, long = "timeout-ms")]
        timeout_ms: Option<u64>,

        /// Bound the content cache to this many entries (LRU eviction)
        #[arg(long = "cache-capacity")]
        cache_capacity: Option<usize>,

        /// Print fetched markup as-is instead of stripping tags
        #[arg(long)]
        raw: bool,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
    pub const fn is_browse(&self) -> bool {
        matches!(self.command, Commands::Browse { .. })
    }
}
