//! `[build]` section configuration.
//!
//! Controls where the index builder reads content and writes the manifest.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in shelf.toml - index builder settings.
///
/// # Example
/// ```toml
/// [build]
/// content = "blog"                 # Folder of published HTML fragments
/// output = "recipes-list.json"     # Manifest destination
/// extension = "html"
/// meta = true                      # Prefer <title> and keywords from markup
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Content source directory.
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Manifest output file.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Recognized content extension, without the leading dot.
    #[serde(default = "defaults::build::extension")]
    #[educe(Default = defaults::build::extension())]
    pub extension: String,

    /// Read titles and tags from the markup of each content file.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub meta: bool,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.content, PathBuf::from("blog"));
        assert_eq!(config.build.output, PathBuf::from("recipes-list.json"));
        assert_eq!(config.build.extension, "html");
        assert!(!config.build.meta);
    }

    #[test]
    fn test_build_config_full() {
        let config = r#"
            [build]
            content = "site/posts"
            output = "site/recipes-list.json"
            extension = "htm"
            meta = true
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.content, PathBuf::from("site/posts"));
        assert_eq!(config.build.output, PathBuf::from("site/recipes-list.json"));
        assert_eq!(config.build.extension, "htm");
        assert!(config.build.meta);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [build]
            minify = true
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }
}
