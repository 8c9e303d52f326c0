//! Storage layer for MoneyMage
//!
//! JSON workbooks and CSV transactions on disk, written atomically.

pub mod file_io;
pub mod transactions;
pub mod workbook;

pub use file_io::{read_json_optional, write_atomic, write_json_atomic};
pub use transactions::TransactionSource;
pub use workbook::WorkbookRepository;

use crate::config::paths::BudgetPaths;
use crate::error::BudgetResult;

/// Main storage coordinator for one budget year
pub struct Storage {
    paths: BudgetPaths,
    pub workbook: WorkbookRepository,
    pub transactions: TransactionSource,
}

impl Storage {
    /// Create a new Storage instance for `year`
    pub fn new(paths: BudgetPaths, year: i32) -> BudgetResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            workbook: WorkbookRepository::new(paths.budget_file(year)),
            transactions: TransactionSource::new(paths.transactions_file()),
            paths,
        })
    }

    /// Same as [`Storage::new`] with explicit file locations
    pub fn with_files(
        paths: BudgetPaths,
        workbook: std::path::PathBuf,
        transactions: std::path::PathBuf,
    ) -> BudgetResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            workbook: WorkbookRepository::new(workbook),
            transactions: TransactionSource::new(transactions),
            paths,
        })
    }

    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    /// Whether the data directory has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }
}
