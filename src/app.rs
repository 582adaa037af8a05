//! Application state and command handlers.
//!
//! This module contains the `App` struct that owns the configuration and
//! the usage ledger for the lifetime of the process. Each user-facing
//! command maps 1:1 onto one ledger or cache operation; there are no
//! ordering dependencies between commands.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use reqwest::{Method, Url};
use tracing::{info, warn};

use crate::cache::manifest::ASSET_PATHS;
use crate::cache::{AssetCacheManager, AssetManifest, HttpFetcher};
use crate::config::Config;
use crate::export;
use crate::ledger::{store::LEDGER_FILE, UsageLedger};
use crate::utils::{format_date, format_doses};

pub struct App {
    config: Config,
    ledger: UsageLedger,
}

impl App {
    /// Construct the single per-process instance: load config, then load
    /// the ledger from the data directory (empty on first run or on a
    /// corrupt file).
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let ledger = UsageLedger::load(config.data_dir()?.join(LEDGER_FILE));
        Ok(Self { config, ledger })
    }

    /// Today's calendar date, the default for date-taking commands
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn show(&self, date: NaiveDate) {
        println!("{}: {}", format_date(date), format_doses(self.ledger.get(date)));
    }

    /// Record one more dose for the day
    pub fn increment(&mut self, date: NaiveDate) -> Result<()> {
        let doses = self.ledger.get(date).saturating_add(1);
        self.ledger.save(date, doses)?;
        println!("Saved");
        self.show(date);
        Ok(())
    }

    /// Remove one dose for the day, never going below zero. The clamp
    /// lives here; the ledger stores whatever it is given.
    pub fn decrement(&mut self, date: NaiveDate) -> Result<()> {
        let doses = self.ledger.get(date).saturating_sub(1);
        self.ledger.save(date, doses)?;
        println!("Saved");
        self.show(date);
        Ok(())
    }

    pub fn set(&mut self, date: NaiveDate, doses: u32) -> Result<()> {
        self.ledger.save(date, doses)?;
        println!("Saved");
        Ok(())
    }

    pub fn reset(&mut self, date: NaiveDate) -> Result<()> {
        self.ledger.reset(date)?;
        println!("Reset for day");
        Ok(())
    }

    pub fn delete(&mut self, date: NaiveDate) -> Result<()> {
        self.ledger.delete(date)?;
        println!("Entry removed");
        Ok(())
    }

    pub fn list(&self) {
        if self.ledger.is_empty() {
            println!("No history yet. Save your first day.");
            return;
        }
        for entry in self.ledger.list_all() {
            println!("{}  {}", format_date(entry.date), format_doses(entry.doses));
        }
    }

    pub fn export(&self, path: Option<&Path>) -> Result<()> {
        let written = export::write_csv(&self.ledger, path)?;
        println!("CSV exported to {}", written.display());
        Ok(())
    }

    /// Install the current asset bundle and evict stale cache versions.
    /// Failure degrades gracefully to online-only use; it never blocks
    /// the ledger.
    pub async fn sync(&self) -> Result<()> {
        let mut manager = self.cache_manager()?;

        if let Err(e) = manager.install().await {
            warn!(error = %e, "Asset cache install failed");
            println!("Offline assets unavailable; continuing online-only");
            return Ok(());
        }
        manager.activate().await?;

        info!(version = manager.version(), state = ?manager.state(), "Offline assets ready");
        println!("Offline assets ready ({})", manager.version());
        Ok(())
    }

    /// Fetch one asset, cache-first, and write its body to stdout.
    pub async fn fetch(&self, path: &str) -> Result<()> {
        use std::io::Write;

        let manager = self.cache_manager()?;
        let url = self
            .base()?
            .join(path)
            .with_context(|| format!("Invalid asset path: {}", path))?;

        let response = manager.serve(Method::GET, &url).await?;
        std::io::stdout().write_all(&response.body)?;
        Ok(())
    }

    /// Set and persist the asset base URL
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        Url::parse(url).with_context(|| format!("Invalid asset base URL: {}", url))?;
        self.config.base_url = Some(url.to_string());
        self.config.save()?;
        println!("Saved");
        Ok(())
    }

    pub fn show_config(&self) {
        match self.config.base_url() {
            Some(url) => println!("base URL: {}", url),
            None => println!("base URL: (unset)"),
        }
    }

    /// The configured deployment base, normalized to a directory URL so
    /// joins behave the same here and in manifest resolution.
    fn base(&self) -> Result<Url> {
        let raw = self.config.base_url().ok_or_else(|| {
            anyhow::anyhow!("No asset base URL configured (set PUFFLOG_BASE_URL or config.json)")
        })?;
        let mut url =
            Url::parse(&raw).with_context(|| format!("Invalid asset base URL: {}", raw))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    fn cache_manager(&self) -> Result<AssetCacheManager<HttpFetcher>> {
        let manifest = match self.config.cache_version.clone() {
            Some(version) => {
                AssetManifest::new(version, ASSET_PATHS.iter().map(|p| p.to_string()).collect())
            }
            None => AssetManifest::default(),
        };

        let manager = AssetCacheManager::new(
            self.config.cache_dir()?,
            self.base()?,
            manifest,
            HttpFetcher::new()?,
        )?;
        Ok(manager)
    }
}

// ============================================================================
// Tests
// ============================================================================
