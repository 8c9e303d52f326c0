//! Path management for MoneyMage
//!
//! ## Path Resolution Order
//!
//! 1. `MONEYMAGE_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory (`~/.config/moneymage` on Linux,
//!    `~/Library/Application Support/moneymage` on macOS, `%APPDATA%\moneymage`
//!    on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::BudgetError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "MONEYMAGE_DATA_DIR";

/// Manages all paths used by MoneyMage
#[derive(Debug, Clone)]
pub struct BudgetPaths {
    /// Base directory for all MoneyMage data
    base_dir: PathBuf,
}

impl BudgetPaths {
    /// Create a new BudgetPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// environment override is not set.
    pub fn new() -> Result<Self, BudgetError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BudgetPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the budget workbooks and transaction files
    pub fn inputs_dir(&self) -> PathBuf {
        self.base_dir.join("inputs")
    }

    /// Directory for generated outputs
    pub fn outputs_dir(&self) -> PathBuf {
        self.base_dir.join("outputs")
    }

    /// Directory for archived workbook copies (inside outputs)
    pub fn archive_dir(&self) -> PathBuf {
        self.outputs_dir().join("archive")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the budget workbook for a given year
    pub fn budget_file(&self, year: i32) -> PathBuf {
        self.inputs_dir().join(format!("Budget_{}.json", year))
    }

    /// Get the path to the transactions file
    pub fn transactions_file(&self) -> PathBuf {
        self.inputs_dir().join("transactions.csv")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), BudgetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.inputs_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create inputs directory: {}", e)))?;

        std::fs::create_dir_all(self.archive_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create archive directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, BudgetError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| BudgetError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("moneymage"))
}
