//! Versioned offline asset cache.
//!
//! This module keeps a fixed bundle of static assets available without a
//! network round-trip. The `AssetCacheManager` drives a three-step
//! lifecycle:
//!
//! - Install: fetch every asset in the manifest into a cache directory
//!   named after the current version (all-or-nothing)
//! - Activate: delete every cache directory from prior versions
//! - Serve: answer GET requests cache-first, everything else from the
//!   network
//!
//! Versioning is manual: bumping the version identifier invalidates the
//! previous cache on the next install/activate cycle.

pub mod error;
pub mod fetcher;
pub mod manager;
pub mod manifest;

pub use error::CacheError;
pub use fetcher::{AssetFetcher, AssetResponse, HttpFetcher};
pub use manager::{AssetCacheManager, CacheLifecycle};
pub use manifest::AssetManifest;
