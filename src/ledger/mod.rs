//! Durable usage ledger module.
//!
//! This module provides the `UsageLedger`, the single source of truth for
//! per-date dose counts. The ledger is held in memory as a date-ordered
//! mapping and mirrored to a JSON file on every mutation.
//!
//! A missing or corrupt ledger file loads as an empty ledger so that
//! recording new data is never blocked by broken history.

pub mod store;

pub use store::UsageLedger;
