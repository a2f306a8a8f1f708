//! HTTP fetching and manifest loading.
//!
//! The view controller never touches the network; everything it needs goes
//! through the [`Fetcher`] trait so the state machine can be driven by an
//! in-memory fetcher in tests and by [`HttpFetcher`] in the terminal browser.

use crate::{
    log,
    manifest::{CONTENT_FOLDER, MANIFEST_FILE, ManifestEntry, parse_manifest},
};
use std::{
    error::Error as _,
    io::{self, Read},
    time::Duration,
};
use thiserror::Error;

// ============================================================================
// Fetcher
// ============================================================================

/// Why a fetch produced no content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP error, status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Transport(String),
}

impl FetchError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status(404))
    }
}

/// `fetch(url) -> content or failure`.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Largest body read from a single response.
const MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Blocking HTTP GET with connect and overall timeouts.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout(timeout)
            .build();
        Self { agent }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match self.agent.get(url).call() {
            Ok(response) => read_body(response),
            Err(ureq::Error::Status(code, _)) => Err(FetchError::Status(code)),
            Err(ureq::Error::Transport(transport)) => Err(classify_transport(&transport)),
        }
    }
}

/// Invalid UTF-8 is replaced rather than failing the whole page.
fn read_body(response: ureq::Response) -> Result<String, FetchError> {
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|err| classify_io(&err))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn classify_io(err: &io::Error) -> FetchError {
    if is_timeout_kind(err.kind()) {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.to_string())
    }
}

/// Timeouts surface as an `io::Error` somewhere in the source chain.
fn classify_transport(transport: &ureq::Transport) -> FetchError {
    let mut source = transport.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>()
            && is_timeout_kind(io_err.kind())
        {
            return FetchError::Timeout;
        }
        source = err.source();
    }

    let message = transport.to_string();
    if message.contains("timed out") {
        FetchError::Timeout
    } else {
        FetchError::Transport(message)
    }
}

const fn is_timeout_kind(kind: io::ErrorKind) -> bool {
    matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

// ============================================================================
// URLs
// ============================================================================

/// `{base}/recipes-list.json`
pub fn manifest_url(base_url: &str) -> String {
    format!("{}/{MANIFEST_FILE}", base_url.trim_end_matches('/'))
}

/// `{base}/blog/{file}`, with each path segment of the file percent-encoded.
pub fn content_url(base_url: &str, file: &str) -> String {
    let file = file
        .split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{CONTENT_FOLDER}/{file}", base_url.trim_end_matches('/'))
}

// ============================================================================
// Manifest Loader
// ============================================================================

/// User-visible outcome of a failed manifest load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// 404: the manifest has not been generated or deployed yet.
    NotDeployed,
    /// Any other failure, with its cause.
    Failed(String),
}

impl LoadStatus {
    pub fn message(&self) -> String {
        match self {
            Self::NotDeployed => "Recipes list not found. Please check deployment.".to_owned(),
            Self::Failed(reason) => format!("Error loading recipes: {reason}."),
        }
    }
}

/// Result of [`load_manifest`]: always a (possibly empty) entry list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestLoad {
    pub entries: Vec<ManifestEntry>,
    pub status: Option<LoadStatus>,
}

/// Fetch and parse `{base_url}/recipes-list.json`.
///
/// Never fails: a 404 degrades to an empty list marked
/// [`LoadStatus::NotDeployed`], every other failure to an empty list marked
/// [`LoadStatus::Failed`].
pub fn load_manifest(fetcher: &dyn Fetcher, base_url: &str) -> ManifestLoad {
    let url = manifest_url(base_url);

    let failed = |status: LoadStatus| ManifestLoad {
        entries: Vec::new(),
        status: Some(status),
    };

    let body = match fetcher.fetch(&url) {
        Ok(body) => body,
        Err(err) if err.is_not_found() => {
            log!("warn"; "{url} not found, check that the manifest is generated and the base URL is correct");
            return failed(LoadStatus::NotDeployed);
        }
        Err(err) => {
            log!("error"; "fetching {url}: {err}");
            return failed(LoadStatus::Failed(err.to_string()));
        }
    };

    match parse_manifest(&body) {
        Ok(entries) => ManifestLoad {
            entries,
            status: None,
        },
        Err(err) => {
            log!("error"; "parsing {url}: {err}");
            failed(LoadStatus::Failed(format!("invalid manifest ({err})")))
        }
    }
}
