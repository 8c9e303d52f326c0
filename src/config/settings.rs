//! User settings for MoneyMage
//!
//! Manages the budget year, the sheets that are never parsed as category
//! budgets, report ordering and archive retention.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::paths::BudgetPaths;
use crate::error::BudgetError;
use crate::storage::file_io::{read_json_optional, write_json_atomic};

/// Sheets generated by a run (or holding workbook-level tables) that are
/// never category budgets.
pub const DEFAULT_EXCLUDED_SHEETS: [&str; 14] = [
    "Projection",
    "Monthly",
    "Expenses",
    "Savings",
    "Balances",
    "Credit Card",
    "Categories",
    "Ideal Monthly",
    "Ideal Projection",
    "Projection Balances",
    "Diffs",
    "Q Summary",
    "Y Summary",
    "Yearly Remaining",
];

/// User settings for MoneyMage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Budget year; the current calendar year when unset
    #[serde(default)]
    pub budget_year: Option<i32>,

    /// Number of workbook archives to keep (0 keeps everything)
    #[serde(default)]
    pub archive_retention: usize,

    /// Absolute difference above which a category is out of balance
    #[serde(default = "default_tolerance")]
    pub out_of_balance_tolerance: f64,

    /// Sheet names that are never parsed as category budgets
    #[serde(default = "default_excluded_sheets")]
    pub excluded_sheets: Vec<String>,

    /// Categories listed first in reports
    #[serde(default = "default_priority_categories")]
    pub priority_categories: Vec<String>,

    /// Date format for dates written to the workbook (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_tolerance() -> f64 {
    0.01
}

fn default_excluded_sheets() -> Vec<String> {
    DEFAULT_EXCLUDED_SHEETS.iter().map(|s| s.to_string()).collect()
}

fn default_priority_categories() -> Vec<String> {
    ["Paycheck", "Charity", "Mortgage", "Taxes"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_date_format() -> String {
    "%m/%d/%Y".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            budget_year: None,
            archive_retention: 0,
            out_of_balance_tolerance: default_tolerance(),
            excluded_sheets: default_excluded_sheets(),
            priority_categories: default_priority_categories(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// The configured budget year, or the current calendar year
    pub fn year(&self) -> i32 {
        self.budget_year
            .unwrap_or_else(|| chrono::Local::now().date_naive().year())
    }

    /// Whether a sheet name is excluded from category parsing
    pub fn is_excluded(&self, sheet: &str) -> bool {
        self.excluded_sheets.iter().any(|s| s == sheet)
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BudgetPaths) -> Result<Self, BudgetError> {
        let settings: Option<Settings> = read_json_optional(paths.settings_file())
            .map_err(|e| BudgetError::Config(format!("Failed to load settings: {}", e)))?;
        Ok(settings.unwrap_or_default())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
            .map_err(|e| BudgetError::Config(format!("Failed to save settings: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.out_of_balance_tolerance, 0.01);
        assert_eq!(settings.archive_retention, 0);
        assert!(settings.is_excluded("Projection"));
        assert!(settings.is_excluded("Balances"));
        assert!(!settings.is_excluded("Groceries"));
        assert_eq!(settings.priority_categories[0], "Paycheck");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.budget_year = Some(2025);
        settings.archive_retention = 10;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.year(), 2025);
        assert_eq!(loaded.archive_retention, 10);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"budget_year": 2024}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.year(), 2024);
        assert_eq!(loaded.date_format, "%m/%d/%Y");
        assert!(loaded.is_excluded("Q Summary"));
    }
}
