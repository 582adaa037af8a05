use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Asset fetch failed for {url}: status {status}")]
    AssetFetch { url: String, status: u16 },

    #[error("Invalid asset URL: {0}")]
    InvalidUrl(String),

    #[error("Corrupt cache entry for {url}: {reason}")]
    Corrupt { url: String, reason: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Cache storage error: {0}")]
    Io(#[from] std::io::Error),
}
