use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use crate::models::UsageEntry;

/// File name of the durable ledger blob in the data directory
pub const LEDGER_FILE: &str = "asthma-usage-entries.json";

/// CSV header line for exports
const CSV_HEADER: &str = "date,doses";

/// In-memory date → dose-count mapping, mirrored to a JSON file on every
/// mutation. Keys are calendar dates; `BTreeMap` keeps them in ascending
/// calendar order, which for ISO dates coincides with lexical order.
#[derive(Debug)]
pub struct UsageLedger {
    entries: BTreeMap<NaiveDate, u32>,
    path: PathBuf,
}

impl UsageLedger {
    /// Load the ledger from `path`. A missing file or a parse failure
    /// yields an empty ledger; corrupted history must never block the
    /// user from recording new data.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Starting with empty ledger");
                BTreeMap::new()
            }
        };
        Self { entries, path }
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<NaiveDate, u32>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ledger file: {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse ledger file: {}", path.display()))
    }

    /// Dose count recorded for `date`, or 0 if the day has no entry.
    pub fn get(&self, date: NaiveDate) -> u32 {
        self.entries.get(&date).copied().unwrap_or(0)
    }

    /// Upsert the entry for `date` and persist the full mapping. The
    /// ledger stores whatever count it is given; clamping is the caller's
    /// responsibility.
    pub fn save(&mut self, date: NaiveDate, doses: u32) -> Result<()> {
        self.entries.insert(date, doses);
        self.persist()
    }

    /// Set the entry for `date` back to zero.
    pub fn reset(&mut self, date: NaiveDate) -> Result<()> {
        self.save(date, 0)
    }

    /// Remove the entry for `date` if present (no-op otherwise) and
    /// persist.
    pub fn delete(&mut self, date: NaiveDate) -> Result<()> {
        self.entries.remove(&date);
        self.persist()
    }

    /// All entries, most recent day first.
    pub fn list_all(&self) -> Vec<UsageEntry> {
        self.entries
            .iter()
            .rev()
            .map(|(&date, &doses)| UsageEntry::new(date, doses))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Two-column CSV of the full history, oldest day first. Neither
    /// column can contain a delimiter, so no quoting is needed.
    pub fn export_csv(&self) -> String {
        let mut lines = vec![CSV_HEADER.to_string()];
        lines.extend(
            self.entries
                .iter()
                .map(|(date, doses)| format!("{},{}", date, doses)),
        );
        lines.join("\n")
    }

    /// Mirror the full mapping to the ledger file, overwriting any
    /// previous contents.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write ledger file: {}", self.path.display()))?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn ledger_in(dir: &tempfile::TempDir) -> UsageLedger {
        UsageLedger::load(dir.path().join(LEDGER_FILE))
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let mut ledger = ledger_in(&dir);
        ledger.save(date("2024-01-01"), 2).unwrap();
        ledger.save(date("2024-01-02"), 7).unwrap();
        // Last save for a date wins
        ledger.save(date("2024-01-01"), 5).unwrap();

        let reloaded = ledger_in(&dir);
        assert_eq!(reloaded.get(date("2024-01-01")), 5);
        assert_eq!(reloaded.get(date("2024-01-02")), 7);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger_in(&dir);
        assert!(ledger.is_empty());
        assert_eq!(ledger.get(date("2024-01-01")), 0);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LEDGER_FILE), "{not json").unwrap();

        let ledger = ledger_in(&dir);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger_in(&dir);

        ledger.save(date("2024-03-10"), 9).unwrap();
        ledger.reset(date("2024-03-10")).unwrap();
        assert_eq!(ledger.get(date("2024-03-10")), 0);

        ledger.reset(date("2024-03-10")).unwrap();
        assert_eq!(ledger.get(date("2024-03-10")), 0);
    }

    #[test]
    fn test_delete_removes_exactly_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger_in(&dir);

        ledger.save(date("2024-01-01"), 1).unwrap();
        ledger.save(date("2024-01-02"), 2).unwrap();
        ledger.delete(date("2024-01-01")).unwrap();

        assert_eq!(ledger.get(date("2024-01-01")), 0);
        assert_eq!(ledger.get(date("2024-01-02")), 2);

        let dates: Vec<NaiveDate> = ledger.list_all().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date("2024-01-02")]);

        // Deleting an absent date is a no-op
        ledger.delete(date("2024-01-01")).unwrap();
        assert_eq!(ledger.list_all().len(), 1);
    }

    #[test]
    fn test_list_all_is_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger_in(&dir);

        ledger.save(date("2024-01-01"), 5).unwrap();
        ledger.save(date("2024-02-15"), 1).unwrap();
        ledger.save(date("2024-01-20"), 3).unwrap();

        let dates: Vec<NaiveDate> = ledger.list_all().iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-02-15"), date("2024-01-20"), date("2024-01-01")]
        );
    }

    #[test]
    fn test_export_csv_exact_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger_in(&dir);

        ledger.save(date("2024-01-02"), 3).unwrap();
        ledger.save(date("2024-01-01"), 5).unwrap();

        assert_eq!(ledger.export_csv(), "date,doses\n2024-01-01,5\n2024-01-02,3");
    }

    #[test]
    fn test_export_csv_empty_ledger_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger_in(&dir);
        assert_eq!(ledger.export_csv(), "date,doses");
    }

    #[test]
    fn test_ledger_file_is_iso_keyed_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger_in(&dir);
        ledger.save(date("2024-01-01"), 4).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(LEDGER_FILE)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["2024-01-01"], 4);
    }
}
