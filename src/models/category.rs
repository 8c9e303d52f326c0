//! Category classification
//!
//! Type membership comes from the workbook's `Categories` sheet: one column
//! per type listing category names. Categories listed nowhere are `Default`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::sheet::{Column, Sheet};
use crate::error::{BudgetError, BudgetResult};

/// Which parsing algorithm applies to a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryType {
    Loan,
    Quarterly,
    Monthly,
    /// Yearly and all other categories
    Default,
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loan => write!(f, "Loan"),
            Self::Quarterly => write!(f, "Quarterly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Default => write!(f, "Default"),
        }
    }
}

/// Classification used by the summary tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SummaryClass {
    Loan,
    Yearly,
    Quarterly,
    Monthly,
    Other,
}

/// The four named type sets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTypes {
    pub loan: BTreeSet<String>,
    pub yearly: BTreeSet<String>,
    pub quarterly: BTreeSet<String>,
    pub monthly: BTreeSet<String>,
}

impl CategoryTypes {
    /// Read the type sets from a `Categories` sheet (columns Loan, Yearly,
    /// Quarterly, Monthly; blanks ignored, missing columns are empty sets)
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let set = |header: &str| sheet.non_blank_texts(header).into_iter().collect();
        Self {
            loan: set("Loan"),
            yearly: set("Yearly"),
            quarterly: set("Quarterly"),
            monthly: set("Monthly"),
        }
    }

    /// Render back to a `Categories` sheet
    pub fn to_sheet(&self) -> Sheet {
        let mut sheet = Sheet::new("Categories")
            .with_column(Column::texts("Loan", self.loan.iter().cloned()))
            .with_column(Column::texts("Yearly", self.yearly.iter().cloned()))
            .with_column(Column::texts("Quarterly", self.quarterly.iter().cloned()))
            .with_column(Column::texts("Monthly", self.monthly.iter().cloned()));
        sheet.equalize();
        sheet
    }

    /// Reject categories listed under more than one type
    pub fn validate(&self) -> BudgetResult<()> {
        let sets = [
            ("Loan", &self.loan),
            ("Yearly", &self.yearly),
            ("Quarterly", &self.quarterly),
            ("Monthly", &self.monthly),
        ];
        for (i, (name_a, a)) in sets.iter().enumerate() {
            for (name_b, b) in sets.iter().skip(i + 1) {
                if let Some(dup) = a.intersection(b).next() {
                    return Err(BudgetError::Validation(format!(
                        "Category '{}' is listed as both {} and {}",
                        dup, name_a, name_b
                    )));
                }
            }
        }
        Ok(())
    }

    /// Parsing algorithm for a category
    pub fn classify(&self, category: &str) -> CategoryType {
        if self.loan.contains(category) {
            CategoryType::Loan
        } else if self.quarterly.contains(category) {
            CategoryType::Quarterly
        } else if self.monthly.contains(category) {
            CategoryType::Monthly
        } else {
            CategoryType::Default
        }
    }

    pub fn is_yearly(&self, category: &str) -> bool {
        self.yearly.contains(category)
    }

    /// Summary classification for a category
    pub fn summary_class(&self, category: &str) -> SummaryClass {
        if self.loan.contains(category) {
            SummaryClass::Loan
        } else if self.yearly.contains(category) {
            SummaryClass::Yearly
        } else if self.quarterly.contains(category) {
            SummaryClass::Quarterly
        } else if self.monthly.contains(category) {
            SummaryClass::Monthly
        } else {
            SummaryClass::Other
        }
    }
}
