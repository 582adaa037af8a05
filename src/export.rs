//! CSV file export for the usage history.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::ledger::UsageLedger;

/// Default export file name
pub const EXPORT_FILE: &str = "asthma-usage.csv";

/// Write the full usage history as CSV. Returns the path written.
pub fn write_csv(ledger: &UsageLedger, path: Option<&Path>) -> Result<PathBuf> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(EXPORT_FILE));

    let csv = ledger.export_csv();
    std::fs::write(&path, csv)
        .with_context(|| format!("Failed to write CSV export: {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_write_csv_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = UsageLedger::load(dir.path().join("ledger.json"));
        ledger
            .save(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 5)
            .unwrap();

        let out = dir.path().join("out.csv");
        let written = write_csv(&ledger, Some(&out)).unwrap();

        assert_eq!(written, out);
        assert_eq!(
            std::fs::read_to_string(out).unwrap(),
            "date,doses\n2024-01-01,5"
        );
    }
}
