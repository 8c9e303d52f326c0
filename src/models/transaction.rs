//! Transaction model
//!
//! One imported bank transaction reduced to what the engine needs. Amounts
//! are signed: negative is an expense, positive is income.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A categorized bank transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: f64, category: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            category: category.into(),
        }
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

/// Distinct categories seen in a transaction list, in first-seen order
pub fn categories_of(transactions: &[Transaction]) -> Vec<String> {
    let mut seen = Vec::new();
    for txn in transactions {
        if !txn.category.is_empty() && !seen.contains(&txn.category) {
            seen.push(txn.category.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn test_categories_of_preserves_first_seen_order() {
        let txns = vec![
            Transaction::new(d(1, 2), -40.0, "Groceries"),
            Transaction::new(d(1, 3), 2000.0, "Paycheck"),
            Transaction::new(d(1, 9), -25.0, "Groceries"),
            Transaction::new(d(1, 9), -5.0, ""),
        ];
        assert_eq!(categories_of(&txns), vec!["Groceries", "Paycheck"]);
    }

    #[test]
    fn test_is_expense() {
        assert!(Transaction::new(d(1, 1), -1.0, "x").is_expense());
        assert!(!Transaction::new(d(1, 1), 1.0, "x").is_expense());
    }
}
