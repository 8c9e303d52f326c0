//! Annual expense plan
//!
//! The `Expenses` sheet lists, per category, the amount budgeted for this
//! year and for next year. Only Yearly categories consult it.

use serde::{Deserialize, Serialize};

use super::ledger::columns::{NEXT_YEAR, THIS_YEAR};
use super::sheet::{Column, Sheet};

pub const EXPENSES_SHEET: &str = "Expenses";
const CATEGORY: &str = "Category";

/// Planned annual amounts for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedExpense {
    pub category: String,
    pub this_year: f64,
    pub next_year: f64,
}

/// The expense-plan table, in sheet order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePlan {
    pub entries: Vec<PlannedExpense>,
}

impl ExpensePlan {
    pub fn new(entries: Vec<PlannedExpense>) -> Self {
        Self { entries }
    }

    /// Read the plan from an `Expenses` sheet; rows without a category are skipped
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let entries = (0..sheet.row_count())
            .filter_map(|i| {
                let category = sheet.cell(CATEGORY, i);
                if category.is_blank() {
                    return None;
                }
                Some(PlannedExpense {
                    category: category.as_text().trim().to_string(),
                    this_year: sheet.cell(THIS_YEAR, i).as_amount(),
                    next_year: sheet.cell(NEXT_YEAR, i).as_amount(),
                })
            })
            .collect();
        Self { entries }
    }

    pub fn to_sheet(&self) -> Sheet {
        Sheet::new(EXPENSES_SHEET)
            .with_column(Column::texts(
                CATEGORY,
                self.entries.iter().map(|e| e.category.clone()),
            ))
            .with_column(Column::numbers(THIS_YEAR, self.entries.iter().map(|e| e.this_year)))
            .with_column(Column::numbers(NEXT_YEAR, self.entries.iter().map(|e| e.next_year)))
    }

    /// First entry for a category
    pub fn get(&self, category: &str) -> Option<&PlannedExpense> {
        self.entries.iter().find(|e| e.category == category)
    }
}
