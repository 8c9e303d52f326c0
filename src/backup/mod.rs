//! Workbook archives for MoneyMage
//!
//! Before a run overwrites the budget workbook, the previous file is copied
//! into the archive directory under a timestamped name. Archives form the
//! only history of a budget; nothing else is persisted between runs.
//!
//! # Naming
//!
//! `<stem>_<month>_<day>_<year>_<HHMMSS>.json`, with a `_<n>` suffix when two
//! archives of the same workbook land in the same second.
//!
//! # Retention
//!
//! `archive_retention` in the settings keeps the newest N archives;
//! zero keeps every archive.

mod manager;

pub use manager::{ArchiveInfo, BackupManager};
