//! `[browse]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[browse]` section in shelf.toml - terminal browser settings.
///
/// # Example
/// ```toml
/// [browse]
/// base_url = "https://alice.github.io/recipe"
/// timeout_ms = 5000
/// cache_capacity = 64
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BrowseConfig {
    /// URL that `recipes-list.json` and `blog/` are resolved against.
    #[serde(default = "defaults::browse::base_url")]
    #[educe(Default = defaults::browse::base_url())]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "defaults::browse::timeout_ms")]
    #[educe(Default = defaults::browse::timeout_ms())]
    pub timeout_ms: u64,

    /// Maximum cached content files. Unset keeps every file for the session.
    #[serde(default = "defaults::browse::cache_capacity")]
    #[educe(Default = defaults::browse::cache_capacity())]
    pub cache_capacity: Option<usize>,
}
