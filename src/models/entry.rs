use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's recorded inhaler usage.
///
/// The date is the identity: the ledger holds at most one entry per
/// calendar day. `NaiveDate` serializes as ISO `YYYY-MM-DD`, so entries
/// round-trip through JSON with canonical date keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub date: NaiveDate,
    pub doses: u32,
}

impl UsageEntry {
    pub fn new(date: NaiveDate, doses: u32) -> Self {
        Self { date, doses }
    }
}

impl std::fmt::Display for UsageEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} doses", self.date, self.doses)
    }
}
