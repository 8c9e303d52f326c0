//! Transaction source
//!
//! Actual transactions come from a CSV export with `Date`, `Amount` and
//! `Category` columns, matched by header name in any order.

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::{BudgetError, BudgetResult};
use crate::models::cell::parse_date_text;
use crate::models::Transaction;

const DATE: &str = "Date";
const AMOUNT: &str = "Amount";
const CATEGORY: &str = "Category";

/// Reads transactions from a CSV file
pub struct TransactionSource {
    path: PathBuf,
}

impl TransactionSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every transaction; `None` when the file does not exist
    pub fn load(&self) -> BudgetResult<Option<Vec<Transaction>>> {
        if !self.path.exists() {
            warn!(path = %self.path.display(), "No transaction file");
            return Ok(None);
        }
        let file = std::fs::File::open(&self.path)?;
        let transactions = read_transactions(file)?;
        debug!(count = transactions.len(), "Loaded transactions");
        Ok(Some(transactions))
    }
}

/// Parse transactions from CSV data with a header row
pub fn read_transactions<R: Read>(reader: R) -> BudgetResult<Vec<Transaction>> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let index = |name: &'static str| -> BudgetResult<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| BudgetError::Csv(format!("Transaction file has no '{}' column", name)))
    };
    let (date_col, amount_col, category_col) = (index(DATE)?, index(AMOUNT)?, index(CATEGORY)?);

    let mut transactions = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = i + 2;
        if is_blank_record(&record) {
            continue;
        }
        let field = |col: usize| record.get(col).unwrap_or("");

        let date_text = field(date_col);
        let date = parse_date_text(date_text).ok_or_else(|| BudgetError::InvalidDate {
            location: format!("transactions line {}", line),
            value: date_text.to_string(),
            suggestion: " (expected MM/DD/YYYY)".to_string(),
        })?;

        transactions.push(Transaction::new(
            date,
            parse_amount(field(amount_col)),
            field(category_col),
        ));
    }
    Ok(transactions)
}

fn is_blank_record(record: &StringRecord) -> bool {
    record.iter().all(|f| f.is_empty())
}

/// Lenient amount parsing: currency symbols and thousands separators are
/// ignored, parentheses mean negative, anything unreadable is zero
pub fn parse_amount(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '(' | ')'))
        .collect();

    let (negative, digits) = match cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner.to_string()),
        None => (false, cleaned),
    };

    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if negative {
                -value
            } else {
                value
            }
        }
        _ => 0.0,
    }
}
