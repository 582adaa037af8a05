//! Network seam for the asset cache.
//!
//! The cache manager talks to the network only through the `AssetFetcher`
//! trait, so every lifecycle transition (including install failure) can be
//! driven in tests without a server.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, Method, Url};

use super::CacheError;

/// HTTP request timeout in seconds.
/// 30s allows for slow asset hosts while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A fetched (or cached) response: status, headers, body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub url: String,
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait AssetFetcher {
    /// Perform one network request and return the full response. A
    /// non-2xx status is a response, not an error; callers decide what
    /// counts as failure.
    fn fetch(
        &self,
        method: Method,
        url: &Url,
    ) -> impl std::future::Future<Output = Result<AssetResponse, CacheError>> + Send;
}

/// reqwest-backed fetcher.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, CacheError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, method: Method, url: &Url) -> Result<AssetResponse, CacheError> {
        let response = self.client.request(method, url.clone()).send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(AssetResponse {
            url: url.as_str().to_string(),
            status,
            headers,
            body,
        })
    }
}
