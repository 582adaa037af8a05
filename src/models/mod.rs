//! Data models for usage tracking.
//!
//! This module contains the data structures shared across the ledger and
//! the command layer:
//!
//! - `UsageEntry`: one day's recorded inhaler doses

pub mod entry;

pub use entry::UsageEntry;
