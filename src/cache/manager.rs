use std::collections::BTreeMap;
use std::path::PathBuf;

use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::fetcher::{AssetFetcher, AssetResponse};
use super::manifest::AssetManifest;
use super::CacheError;

/// Lifecycle of a cache version. Install and Activate are strictly
/// sequential: the caller must not begin Activate until Install has
/// completed, and must not serve until Activate has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLifecycle {
    Uninstalled,
    Installing,
    Installed,
    Activating,
    Active,
}

/// On-disk metadata for one cached response; the body lives in a sibling
/// `.body` file.
#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    headers: BTreeMap<String, String>,
}

pub struct AssetCacheManager<F> {
    cache_root: PathBuf,
    base_url: Url,
    manifest: AssetManifest,
    fetcher: F,
    state: CacheLifecycle,
}

impl<F: AssetFetcher> AssetCacheManager<F> {
    pub fn new(
        cache_root: PathBuf,
        base_url: Url,
        manifest: AssetManifest,
        fetcher: F,
    ) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&cache_root)?;
        Ok(Self {
            cache_root,
            base_url,
            manifest,
            fetcher,
            state: CacheLifecycle::Uninstalled,
        })
    }

    pub fn state(&self) -> CacheLifecycle {
        self.state
    }

    pub fn version(&self) -> &str {
        &self.manifest.version
    }

    /// Directory holding the current version's entries
    fn version_dir(&self) -> PathBuf {
        self.cache_root.join(&self.manifest.version)
    }

    /// Filename-safe key for a request URL
    fn entry_key(url: &Url) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.version_dir().join(format!("{}.json", key))
    }

    fn body_path(&self, key: &str) -> PathBuf {
        self.version_dir().join(format!("{}.body", key))
    }

    /// Fetch and store every manifest asset into the current version's
    /// cache directory. All-or-nothing: the first failure removes the
    /// partial directory and leaves the manager uninstalled.
    pub async fn install(&mut self) -> Result<(), CacheError> {
        self.state = CacheLifecycle::Installing;
        info!(version = %self.manifest.version, "Installing asset cache");

        match self.install_inner().await {
            Ok(()) => {
                self.state = CacheLifecycle::Installed;
                info!(version = %self.manifest.version, "Asset cache installed");
                Ok(())
            }
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_dir_all(self.version_dir()) {
                    debug!(error = %cleanup, "No partial cache directory to remove");
                }
                self.state = CacheLifecycle::Uninstalled;
                warn!(version = %self.manifest.version, error = %e, "Asset cache install failed");
                Err(e)
            }
        }
    }

    async fn install_inner(&self) -> Result<(), CacheError> {
        let urls = self.manifest.resolve(&self.base_url)?;
        std::fs::create_dir_all(self.version_dir())?;

        for url in &urls {
            let response = self.fetcher.fetch(Method::GET, url).await?;
            if !response.is_success() {
                return Err(CacheError::AssetFetch {
                    url: url.as_str().to_string(),
                    status: response.status,
                });
            }
            self.store(url, &response)?;
            debug!(url = %url, "Cached asset");
        }

        Ok(())
    }

    fn store(&self, url: &Url, response: &AssetResponse) -> Result<(), CacheError> {
        let key = Self::entry_key(url);
        let meta = EntryMeta {
            url: response.url.clone(),
            status: response.status,
            headers: response.headers.clone(),
        };
        let contents = serde_json::to_string_pretty(&meta).map_err(|e| CacheError::Corrupt {
            url: response.url.clone(),
            reason: e.to_string(),
        })?;
        std::fs::write(self.meta_path(&key), contents)?;
        std::fs::write(self.body_path(&key), &response.body)?;
        Ok(())
    }

    /// Delete every cache directory from a version other than the current
    /// one. After this completes, exactly one version is live.
    pub async fn activate(&mut self) -> Result<(), CacheError> {
        self.state = CacheLifecycle::Activating;

        for entry in std::fs::read_dir(&self.cache_root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            if entry.file_name() != self.manifest.version.as_str() {
                info!(stale = %entry.file_name().to_string_lossy(), "Removing stale cache version");
                std::fs::remove_dir_all(entry.path())?;
            }
        }

        self.state = CacheLifecycle::Active;
        info!(version = %self.manifest.version, "Asset cache active");
        Ok(())
    }

    /// Look up a URL in the current version's cache.
    pub fn lookup(&self, url: &Url) -> Result<Option<AssetResponse>, CacheError> {
        let key = Self::entry_key(url);
        let meta_path = self.meta_path(&key);
        if !meta_path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&meta_path)?;
        let meta: EntryMeta =
            serde_json::from_str(&contents).map_err(|e| CacheError::Corrupt {
                url: url.as_str().to_string(),
                reason: e.to_string(),
            })?;

        let body_path = self.body_path(&key);
        if !body_path.exists() {
            return Err(CacheError::Corrupt {
                url: url.as_str().to_string(),
                reason: "missing body file".to_string(),
            });
        }
        let body = std::fs::read(&body_path)?;

        Ok(Some(AssetResponse {
            url: meta.url,
            status: meta.status,
            headers: meta.headers,
            body,
        }))
    }

    /// Answer one request. Non-GET requests pass straight through to the
    /// network. GET requests are served from the cache when possible; a
    /// miss goes to the network and is not written back, since cache
    /// population happens only at install time.
    pub async fn serve(&self, method: Method, url: &Url) -> Result<AssetResponse, CacheError> {
        if method != Method::GET {
            return self.fetcher.fetch(method, url).await;
        }

        if let Some(cached) = self.lookup(url)? {
            debug!(url = %url, "Cache hit");
            return Ok(cached);
        }

        debug!(url = %url, "Cache miss, fetching from network");
        self.fetcher.fetch(Method::GET, url).await
    }
}

// ============================================================================
// Tests
// ============================================================================
