//! Workbook cell values and their coercion rules
//!
//! Amount coercion is lenient: anything that is not a number becomes `0.0`.
//! Date parsing is strict: a value that is not a recognizable calendar date
//! is an error naming the row, with a suggested fix when the value looks like
//! a spreadsheet serial date or an epoch timestamp.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, BudgetResult};

/// Text date formats accepted in ledger and transaction cells
const DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y", "%d/%m/%Y"];

/// Days-since-1899-12-30 values above this look like spreadsheet serial dates
const SERIAL_DATE_THRESHOLD: f64 = 25_000.0;

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Blank cell
    #[default]
    Empty,
    /// Numeric cell
    Number(f64),
    /// Text cell
    Text(String),
}

impl CellValue {
    /// Create a text cell
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Create a date cell rendered with the given strftime format
    pub fn date(date: NaiveDate, format: &str) -> Self {
        Self::Text(date.format(format).to_string())
    }

    /// Whether the cell is blank (empty or whitespace-only text)
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    /// Lenient numeric coercion: numbers and numeric text parse, the rest is 0.0
    pub fn as_amount(&self) -> f64 {
        match self {
            Self::Number(n) if n.is_finite() => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// The strictly numeric value, if the cell holds one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Cell content as display text; numbers drop a zero fraction
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
        }
    }

    /// Parse the cell as a date. Blank cells yield `None`.
    ///
    /// `row` is the 1-based data row used in error messages. `format` is the
    /// workbook's configured date format, tried before the built-in ones.
    pub fn as_date(&self, row: usize, format: &str) -> BudgetResult<Option<NaiveDate>> {
        match self {
            Self::Empty => Ok(None),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => parse_date_text_as(s, format).map(Some).ok_or_else(|| BudgetError::InvalidDate {
                location: format!("row {}", row),
                value: s.clone(),
                suggestion: " (try entering the date in MM/DD/YYYY format)".to_string(),
            }),
            Self::Number(n) => Err(BudgetError::InvalidDate {
                location: format!("row {}", row),
                value: format_number(*n),
                suggestion: suggest_date_fix(*n),
            }),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Parse a text date; anything after a comma is ignored ("01/05/2025, 10:00")
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let clean = s.split(',').next().unwrap_or("").trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(clean, fmt).ok())
}

/// Parse a text date in `format`, falling back to the built-in formats
pub fn parse_date_text_as(s: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), format)
        .ok()
        .or_else(|| parse_date_text(s))
}

/// Suggest a calendar date for a numeric value typed into a date cell
fn suggest_date_fix(value: f64) -> String {
    let suggested = if value >= 1e17 {
        DateTime::from_timestamp((value / 1e9) as i64, 0).map(|dt| (dt.date_naive(), "a timestamp"))
    } else if value >= 1e11 {
        DateTime::from_timestamp((value / 1e3) as i64, 0).map(|dt| (dt.date_naive(), "a timestamp"))
    } else if value >= 1e8 {
        DateTime::from_timestamp(value as i64, 0).map(|dt| (dt.date_naive(), "a timestamp"))
    } else if value > SERIAL_DATE_THRESHOLD {
        NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|base| base.checked_add_signed(Duration::days(value as i64)))
            .map(|date| (date, "a spreadsheet serial date"))
    } else {
        None
    };

    match suggested {
        Some((date, kind)) => format!(
            " (this looks like {}; reformat the cell as a date or enter {})",
            kind,
            date.format("%m/%d/%Y")
        ),
        None => " (try entering the date in MM/DD/YYYY format)".to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_coercion_is_lenient() {
        assert_eq!(CellValue::Number(12.5).as_amount(), 12.5);
        assert_eq!(CellValue::text(" -40 ").as_amount(), -40.0);
        assert_eq!(CellValue::text("n/a").as_amount(), 0.0);
        assert_eq!(CellValue::Empty.as_amount(), 0.0);
        assert_eq!(CellValue::Number(f64::NAN).as_amount(), 0.0);
    }

    #[test]
    fn test_parse_text_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(CellValue::text("01/05/2025").as_date(1, "%m/%d/%Y").unwrap(), Some(expected));
        assert_eq!(CellValue::text("2025-01-05").as_date(1, "%m/%d/%Y").unwrap(), Some(expected));
        assert_eq!(
            CellValue::text("01/05/2025, 09:30").as_date(1, "%m/%d/%Y").unwrap(),
            Some(expected)
        );
        assert_eq!(CellValue::Empty.as_date(1, "%m/%d/%Y").unwrap(), None);
        assert_eq!(CellValue::text("  ").as_date(1, "%m/%d/%Y").unwrap(), None);
    }

    #[test]
    fn test_configured_format_is_tried_first() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(
            CellValue::text("15.01.2025").as_date(1, "%d.%m.%Y").unwrap(),
            Some(expected)
        );
        assert_eq!(
            CellValue::text("Jan 15, 2025").as_date(1, "%b %d, %Y").unwrap(),
            Some(expected)
        );
        // built-in formats still parse under a custom format
        assert_eq!(
            CellValue::text("01/15/2025").as_date(1, "%d.%m.%Y").unwrap(),
            Some(expected)
        );
        assert!(CellValue::text("15.01.2025").as_date(4, "%m/%d/%Y").is_err());
    }

    #[test]
    fn test_bad_text_date_names_row() {
        let err = CellValue::text("tomorrow").as_date(7, "%m/%d/%Y").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 7"));
        assert!(msg.contains("tomorrow"));
        assert!(msg.contains("MM/DD/YYYY"));
    }

    #[test]
    fn test_serial_date_suggestion() {
        // 45658 is 2025-01-01 as a spreadsheet serial date
        let err = CellValue::Number(45658.0).as_date(2, "%m/%d/%Y").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("serial date"), "{msg}");
        assert!(msg.contains("01/01/2025"), "{msg}");
    }

    #[test]
    fn test_epoch_suggestion() {
        // 2025-01-01T00:00:00Z in milliseconds
        let err = CellValue::Number(1_735_689_600_000.0).as_date(3, "%m/%d/%Y").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("timestamp"), "{msg}");
        assert!(msg.contains("01/01/2025"), "{msg}");
    }

    #[test]
    fn test_untagged_serde() {
        let cells: Vec<CellValue> = serde_json::from_str(r#"[null, 3.5, "x"]"#).unwrap();
        assert_eq!(
            cells,
            vec![CellValue::Empty, CellValue::Number(3.5), CellValue::text("x")]
        );
    }

    #[test]
    fn test_as_text() {
        assert_eq!(CellValue::Number(3.0).as_text(), "3");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
        assert_eq!(CellValue::Empty.as_text(), "");
    }
}
