//! PSL data sources.
//!
//! The matcher only consumes bytes; these loaders produce them from a file,
//! memory, or a remote URL. Caching and refresh scheduling are left to the
//! caller.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{LoadErrorKind, Result, TldError};

/// Canonical location of the Public Suffix List
pub const DEFAULT_PSL_URL: &str = "https://publicsuffix.org/list/public_suffix_list.dat";

/// Default HTTP timeout for fetching the list
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for loading raw PSL bytes
pub trait PslLoader: Send + Sync {
    /// Load the raw list
    fn load(&self) -> Result<Vec<u8>>;
}

/// Fetch the list over HTTP.
pub fn fetch_psl(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    tracing::info!(url, "fetching public suffix list");

    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into();

    let response = agent.get(url).call().map_err(|e| {
        TldError::load(LoadErrorKind::DownloadFailed, format!("Download failed: {}", e))
    })?;

    let (_, body) = response.into_parts();
    let mut reader = body.into_reader();
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| {
        TldError::load(
            LoadErrorKind::DownloadFailed,
            format!("Failed to read response body: {}", e),
        )
    })?;

    tracing::debug!(url, bytes = bytes.len(), "fetched public suffix list");
    Ok(bytes)
}

/// Loads the list from a file
#[derive(Debug, Clone)]
pub struct FilePslLoader {
    path: PathBuf,
}

impl FilePslLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PslLoader for FilePslLoader {
    fn load(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| {
            TldError::load(
                LoadErrorKind::FileError,
                format!("Failed to read '{}': {}", self.path.display(), e),
            )
        })
    }
}

/// Serves the list from memory
#[derive(Debug, Clone, Default)]
pub struct MemoryPslLoader {
    bytes: Vec<u8>,
}

impl MemoryPslLoader {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl PslLoader for MemoryPslLoader {
    fn load(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Fetches the list from a URL on every load
#[derive(Debug, Clone)]
pub struct HttpPslLoader {
    url: String,
    timeout: Duration,
}

impl HttpPslLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpPslLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PSL_URL)
    }
}

impl PslLoader for HttpPslLoader {
    fn load(&self) -> Result<Vec<u8>> {
        fetch_psl(&self.url, self.timeout)
    }
}
