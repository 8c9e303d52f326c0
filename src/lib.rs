//! MoneyMage - household budget workbook updater
//!
//! Merges actual transactions into per-category budget ledgers, applies each
//! category's accrual rules, and projects cash flow and balances five years
//! ahead.
//!
//! # Architecture
//!
//! - `config`: Paths and user settings
//! - `error`: Custom error types
//! - `models`: Workbook cells and sheets, typed ledgers, projection events
//! - `services`: Aggregation, category parsing, forecasting, projection
//! - `reports`: Tabular views over a run
//! - `storage`: JSON workbook and CSV transactions on disk
//! - `backup`: Timestamped workbook archives
//! - `export`: Workbook, JSON, YAML and CSV output
//! - `display`: Terminal tables
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use moneymage::config::{BudgetPaths, Settings};
//! use moneymage::services::BudgetUpdater;
//! use moneymage::storage::Storage;
//!
//! let paths = BudgetPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths, settings.year())?;
//! let workbook = storage.workbook.load()?;
//! let transactions = storage.transactions.load()?;
//! let report = BudgetUpdater::new(&settings).run(
//!     &workbook,
//!     transactions.as_deref(),
//!     settings.year(),
//!     chrono::Local::now().date_naive(),
//! )?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
