//! The budget workbook: an ordered set of named sheets

use serde::{Deserialize, Serialize};

use super::sheet::{Column, Sheet};

pub const CATEGORIES_SHEET: &str = "Categories";
pub const BALANCES_SHEET: &str = "Balances";

/// All sheets of one budget year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// An empty workbook with the Categories, Expenses and Balances sheets
    pub fn template() -> Self {
        let blank = |name: &str, headers: &[&str]| {
            headers
                .iter()
                .fold(Sheet::new(name), |sheet, h| sheet.with_column(Column::new(*h, Vec::new())))
        };
        Self::new(vec![
            blank(CATEGORIES_SHEET, &["Loan", "Yearly", "Quarterly", "Monthly"]),
            blank(super::expense::EXPENSES_SHEET, &["Category", "This Year", "Next Year"]),
            blank(BALANCES_SHEET, &["Date", "Balance"]),
        ])
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    /// Replace the sheet with the same name, or append
    pub fn set_sheet(&mut self, sheet: Sheet) {
        if let Some(existing) = self.sheets.iter_mut().find(|s| s.name == sheet.name) {
            *existing = sheet;
        } else {
            self.sheets.push(sheet);
        }
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }
}
