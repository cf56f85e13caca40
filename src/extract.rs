//! Extraction engine.
//!
//! Holds the active rule set and answers parse calls against it.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use lru::LruCache;
use parking_lot::{Mutex, RwLock};

use crate::error::Result;
use crate::host::Extractable;
use crate::loader::{fetch_psl, PslLoader, DEFAULT_FETCH_TIMEOUT, DEFAULT_PSL_URL};
use crate::matcher::TldParser;
use crate::psl::{parse_psl, RuleSet};
use crate::types::{ParseMode, TldResult};

/// Default LRU cache size
pub const DEFAULT_CACHE_SIZE: usize = 1024;

/// Extractor options.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// LRU cache size for parse results (0 disables caching)
    pub cache_size: usize,
    /// URL used by `fetch_latest_psl`
    pub psl_url: String,
    /// HTTP timeout used by `fetch_latest_psl`
    pub fetch_timeout: Duration,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            psl_url: DEFAULT_PSL_URL.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl ExtractOptions {
    /// Create new extractor options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cache size.
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Set the URL of the list fetched by `fetch_latest_psl`.
    pub fn with_psl_url(mut self, url: impl Into<String>) -> Self {
        self.psl_url = url.into();
        self
    }

    /// Set the fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

/// Cache key: canonical host and mode
type CacheKey = (String, ParseMode);

/// Parse results tagged with the rule set generation they were computed against
struct ResultCache {
    generation: u64,
    entries: LruCache<CacheKey, Option<TldResult>>,
}

/// Active rule set and its generation
struct Snapshot {
    rules: Arc<RuleSet>,
    generation: u64,
}

/// Extracts root domain, top level domain, second level domain and subdomain
/// from URLs and hostnames.
///
/// The rule set can be swapped at any time with `reload*` or
/// `fetch_latest_psl`; parse calls running concurrently see either the old
/// or the new set, never a mix.
pub struct TldExtract {
    snapshot: RwLock<Snapshot>,
    cache: Option<Mutex<ResultCache>>,
    options: ExtractOptions,
}

impl TldExtract {
    /// Create an extractor with default options.
    pub fn new(rules: RuleSet) -> Self {
        Self::with_options(rules, ExtractOptions::default())
    }

    /// Create an extractor with explicit options.
    pub fn with_options(rules: RuleSet, options: ExtractOptions) -> Self {
        let cache = NonZeroUsize::new(options.cache_size).map(|size| {
            Mutex::new(ResultCache {
                generation: 0,
                entries: LruCache::new(size),
            })
        });

        Self {
            snapshot: RwLock::new(Snapshot {
                rules: Arc::new(rules),
                generation: 0,
            }),
            cache,
            options,
        }
    }

    /// Create an extractor from raw PSL bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(parse_psl(bytes)?))
    }

    /// Create an extractor from a PSL file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(RuleSet::from_file(path)?))
    }

    /// Create an extractor from a loader.
    pub fn from_loader(loader: &dyn PslLoader, options: ExtractOptions) -> Result<Self> {
        let rules = parse_psl(&loader.load()?)?;
        Ok(Self::with_options(rules, options))
    }

    /// Extract `input`.
    ///
    /// With `quick` set only normal rules are consulted; otherwise exception
    /// and wildcard rules are tried first and normal rules are the fallback.
    pub fn parse<T: Extractable + ?Sized>(&self, input: &T, quick: bool) -> Option<TldResult> {
        let mode = if quick {
            ParseMode::NormalsOnly
        } else {
            ParseMode::Full
        };
        self.parse_with_mode(input, mode)
    }

    /// Extract `input` using an explicit mode.
    pub fn parse_with_mode<T: Extractable + ?Sized>(
        &self,
        input: &T,
        mode: ParseMode,
    ) -> Option<TldResult> {
        let host = input.hostname()?;
        let (rules, generation) = self.current();

        let Some(cache) = self.cache.as_ref() else {
            return TldParser::new(&rules).parse(&host, mode);
        };

        let key = (host, mode);
        if let Some(cached) = cache.lock().entries.get(&key) {
            return cached.clone();
        }

        // Matching is CPU-only; compute outside the lock
        let result = TldParser::new(&rules).parse(&key.0, mode);

        let mut cache = cache.lock();
        if cache.generation == generation {
            cache.entries.put(key, result.clone());
        }

        result
    }

    /// Current rule set snapshot
    pub fn rule_set(&self) -> Arc<RuleSet> {
        self.snapshot.read().rules.clone()
    }

    /// Replace the active rule set.
    pub fn reload(&self, rules: RuleSet) {
        let rules = Arc::new(rules);
        let generation = {
            let mut snapshot = self.snapshot.write();
            snapshot.generation += 1;
            snapshot.rules = rules.clone();
            snapshot.generation
        };

        if let Some(cache) = self.cache.as_ref() {
            let mut cache = cache.lock();
            cache.entries.clear();
            cache.generation = generation;
        }

        tracing::info!(rules = rules.len(), generation, "reloaded public suffix list");
    }

    /// Rebuild from raw PSL bytes. On failure the active rule set is kept.
    pub fn reload_from_bytes(&self, bytes: &[u8]) -> Result<()> {
        let rules = parse_psl(bytes).inspect_err(|e| {
            tracing::warn!(error = %e, "keeping current public suffix list");
        })?;
        self.reload(rules);
        Ok(())
    }

    /// Rebuild from a loader. On failure the active rule set is kept.
    pub fn reload_from_loader(&self, loader: &dyn PslLoader) -> Result<()> {
        let bytes = loader.load()?;
        self.reload_from_bytes(&bytes)
    }

    /// Fetch the latest list from the configured URL and rebuild.
    pub fn fetch_latest_psl(&self) -> Result<()> {
        let bytes = fetch_psl(&self.options.psl_url, self.options.fetch_timeout)?;
        self.reload_from_bytes(&bytes)
    }

    /// Fetch the latest list on the blocking pool and rebuild.
    #[cfg(feature = "async")]
    pub async fn fetch_latest_psl_async(&self) -> Result<()> {
        let url = self.options.psl_url.clone();
        let timeout = self.options.fetch_timeout;

        let bytes = tokio::task::spawn_blocking(move || fetch_psl(&url, timeout))
            .await
            .map_err(|e| {
                crate::error::TldError::load(
                    crate::error::LoadErrorKind::DownloadFailed,
                    format!("Fetch task failed: {}", e),
                )
            })??;

        self.reload_from_bytes(&bytes)
    }

    /// Clear the result cache
    pub fn clear_cache(&self) {
        if let Some(cache) = self.cache.as_ref() {
            cache.lock().entries.clear();
        }
    }

    /// Number of cached results
    pub fn cached_len(&self) -> usize {
        self.cache
            .as_ref()
            .map(|cache| cache.lock().entries.len())
            .unwrap_or(0)
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    fn current(&self) -> (Arc<RuleSet>, u64) {
        let snapshot = self.snapshot.read();
        (snapshot.rules.clone(), snapshot.generation)
    }
}
