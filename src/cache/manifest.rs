use reqwest::Url;

use super::CacheError;

/// Current cache version identifier.
/// Bump whenever asset contents change; activation evicts older versions.
pub const CACHE_VERSION: &str = "asthma-tracker-v2";

/// Relative paths of the static asset bundle, in install order.
pub const ASSET_PATHS: [&str; 5] = [
    ".",
    "index.html",
    "styles.css",
    "app.js",
    "manifest.webmanifest",
];

/// The fixed list of assets an install must fetch, tagged with the cache
/// version they belong to.
#[derive(Debug, Clone)]
pub struct AssetManifest {
    pub version: String,
    pub paths: Vec<String>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION.to_string(),
            paths: ASSET_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl AssetManifest {
    pub fn new(version: impl Into<String>, paths: Vec<String>) -> Self {
        Self {
            version: version.into(),
            paths,
        }
    }

    /// Resolve every manifest path to an absolute URL against the
    /// deployment base, preserving manifest order. The base is treated as
    /// a directory, so a missing trailing slash is added before joining.
    pub fn resolve(&self, base: &Url) -> Result<Vec<Url>, CacheError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        self.paths
            .iter()
            .map(|path| {
                base.join(path)
                    .map_err(|e| CacheError::InvalidUrl(format!("{}: {}", path, e)))
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_preserves_manifest_order() {
        let manifest = AssetManifest::default();
        let base = Url::parse("https://example.com/codex/").unwrap();

        let urls = manifest.resolve(&base).unwrap();
        let resolved: Vec<&str> = urls.iter().map(|u| u.as_str()).collect();
        assert_eq!(
            resolved,
            vec![
                "https://example.com/codex/",
                "https://example.com/codex/index.html",
                "https://example.com/codex/styles.css",
                "https://example.com/codex/app.js",
                "https://example.com/codex/manifest.webmanifest",
            ]
        );
    }

    #[test]
    fn test_resolve_treats_base_as_directory() {
        let manifest = AssetManifest::new("v1", vec!["index.html".to_string()]);
        let base = Url::parse("https://example.com/codex").unwrap();

        let urls = manifest.resolve(&base).unwrap();
        assert_eq!(urls[0].as_str(), "https://example.com/codex/index.html");
    }
}
