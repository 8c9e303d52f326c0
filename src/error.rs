//! Custom error types for MoneyMage
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Structural problems in a budget workbook
//! (a missing column, a category without an expense plan, a bad date) are
//! fatal for the whole run; lenient number coercion never produces an error.

use thiserror::Error;

/// The main error type for MoneyMage operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for input data
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A category ledger lacks a column its budget type requires
    #[error("Budget '{category}' is missing required column '{column}'")]
    MissingColumn {
        category: String,
        column: &'static str,
    },

    /// A yearly category has no row in the Expenses sheet
    #[error("Category '{category}' is classified Yearly but is not in the Expenses sheet")]
    MissingExpensePlan { category: String },

    /// A date cell could not be understood
    #[error("Cannot parse date at {location}: '{value}'{suggestion}")]
    InvalidDate {
        location: String,
        value: String,
        suggestion: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Workbook archive errors
    #[error("Backup error: {0}")]
    Backup(String),
}

impl BudgetError {
    /// Create a "not found" error for files
    pub fn file_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "File",
            identifier: identifier.into(),
        }
    }

    /// Create a missing-column error for a category
    pub fn missing_column(category: impl Into<String>, column: &'static str) -> Self {
        Self::MissingColumn {
            category: category.into(),
            column,
        }
    }

    /// Prefix the location of a date error with the sheet it came from
    pub fn in_sheet(self, sheet: &str) -> Self {
        match self {
            Self::InvalidDate {
                location,
                value,
                suggestion,
            } => Self::InvalidDate {
                location: format!("sheet '{}' {}", sheet, location),
                value,
                suggestion,
            },
            other => other,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error comes from malformed budget data
    pub fn is_malformed_budget(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. } | Self::MissingExpensePlan { .. } | Self::InvalidDate { .. }
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for BudgetError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for MoneyMage operations
pub type BudgetResult<T> = Result<T, BudgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BudgetError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_missing_column_names_category_and_field() {
        let err = BudgetError::missing_column("CarLoan", "Payment");
        assert_eq!(
            err.to_string(),
            "Budget 'CarLoan' is missing required column 'Payment'"
        );
        assert!(err.is_malformed_budget());
    }

    #[test]
    fn test_missing_expense_plan() {
        let err = BudgetError::MissingExpensePlan {
            category: "Insurance".into(),
        };
        assert!(err.to_string().contains("Insurance"));
        assert!(err.to_string().contains("Expenses"));
    }

    #[test]
    fn test_not_found_error() {
        let err = BudgetError::file_not_found("budget_2025.json");
        assert_eq!(err.to_string(), "File not found: budget_2025.json");
        assert!(err.is_not_found());
        assert!(!err.is_malformed_budget());
    }

    #[test]
    fn test_invalid_date_in_sheet() {
        let err = BudgetError::InvalidDate {
            location: "row 3".into(),
            value: "soon".into(),
            suggestion: String::new(),
        }
        .in_sheet("Groceries");
        assert_eq!(
            err.to_string(),
            "Cannot parse date at sheet 'Groceries' row 3: 'soon'"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BudgetError = io_err.into();
        assert!(matches!(err, BudgetError::Io(_)));
    }
}
