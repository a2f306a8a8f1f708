//! Site configuration management for `shelf.toml`.
//!
//! The file is optional: every key has a default, and the build inputs can
//! come straight from the environment (`BLOG_CONTENT_FOLDER`,
//! `OUTPUT_INDEX_DB_FILE`) the way a CI workflow passes them.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[build]`   | Content folder, manifest path, extension       |
//! | `[serve]`   | Development server (port, interface, mount)    |
//! | `[browse]`  | Terminal browser (base URL, timeout, cache)    |
//!
//! # Precedence
//!
//! CLI flag > environment variable > `shelf.toml` > built-in default.
//! Relative paths in `shelf.toml` resolve against the file's directory;
//! relative paths from flags or the environment resolve against the
//! working directory.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "blog"
//! output = "recipes-list.json"
//!
//! [serve]
//! port = 5277
//! base_path = "/recipe"
//!
//! [browse]
//! base_url = "https://alice.github.io/recipe"
//! ```

mod browse;
mod build;
pub mod defaults;
mod error;
mod serve;

use browse::BrowseConfig;
use build::BuildConfig;
pub use error::ConfigError;
use serve::ServeConfig;

use crate::cli::{BuildArgs, Cli, Commands};
use anyhow::{Context, Result};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing shelf.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Path of the config file (may not exist)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Index builder settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Terminal browser settings
    #[serde(default)]
    pub browse: BrowseConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML text read from `path`.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Toml(path.to_path_buf(), err))
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::parse(&content, path)?;
        config.resolve_relative_to(path.parent().unwrap_or(Path::new("")));
        Ok(config)
    }

    /// Build the effective configuration for a CLI invocation.
    ///
    /// A missing config file is not an error: defaults apply.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = if cli.config.exists() {
            Self::from_path(&cli.config)
                .with_context(|| format!("Failed to load {}", cli.config.display()))?
        } else {
            Self::default()
        };
        config.config_path = cli.config.clone();

        config.update_with_cli(cli);
        config.normalize();
        config.validate()?;

        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => self.update_build(build_args),
            Commands::Serve {
                build_args,
                interface,
                port,
                root,
                base_path,
            } => {
                self.update_build(build_args);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.root, root.as_ref());
                Self::update_option(&mut self.serve.base_path, base_path.as_ref());
            }
            Commands::Browse {
                base_url,
                timeout_ms,
                cache_capacity,
                ..
            } => {
                Self::update_option(&mut self.browse.base_url, base_url.as_ref());
                Self::update_option(&mut self.browse.timeout_ms, timeout_ms.as_ref());
                if cache_capacity.is_some() {
                    self.browse.cache_capacity = *cache_capacity;
                }
            }
        }
    }

    fn update_build(&mut self, args: &BuildArgs) {
        Self::update_option(&mut self.build.content, args.content.as_ref());
        Self::update_option(&mut self.build.output, args.output.as_ref());
        Self::update_option(&mut self.build.extension, args.extension.as_ref());
        Self::update_option(&mut self.build.meta, args.meta.as_ref());
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Anchor relative paths from the config file to its directory
    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [
            &mut self.build.content,
            &mut self.build.output,
            &mut self.serve.root,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Canonical forms: bare extension, `/prefix` mount, no trailing slash on URLs
    fn normalize(&mut self) {
        self.build.extension = self.build.extension.trim().trim_start_matches('.').to_owned();

        let base_path = self.serve.base_path.trim().trim_matches('/');
        self.serve.base_path = if base_path.is_empty() {
            String::new()
        } else {
            format!("/{base_path}")
        };

        self.browse.base_url = self.browse.base_url.trim().trim_end_matches('/').to_owned();
    }

    /// Validate the effective configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build.extension.is_empty() {
            return Err(ConfigError::invalid("build.extension", "must not be empty"));
        }
        if self.build.extension.contains(['/', '\\']) {
            return Err(ConfigError::invalid(
                "build.extension",
                format!("`{}` is not a file extension", self.build.extension),
            ));
        }

        if self.serve.interface.parse::<IpAddr>().is_err() {
            return Err(ConfigError::invalid(
                "serve.interface",
                format!("`{}` is not an IP address", self.serve.interface),
            ));
        }

        let url = &self.browse.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "browse.base_url",
                format!("`{url}` must start with http:// or https://"),
            ));
        }
        if self.browse.timeout_ms == 0 {
            return Err(ConfigError::invalid("browse.timeout_ms", "must be greater than 0"));
        }
        if self.browse.cache_capacity == Some(0) {
            return Err(ConfigError::invalid(
                "browse.cache_capacity",
                "must be greater than 0 (omit it for an unbounded cache)",
            ));
        }

        Ok(())
    }
}
