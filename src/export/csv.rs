//! CSV export
//!
//! Spreadsheet-friendly dumps of the projection and the summaries.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::ProjectionEvent;
use crate::services::{ProjectionBalances, QuarterSummary, RemainingExpenseTable, YearSummary};

fn amount(value: f64) -> String {
    format!("{:.2}", value)
}

fn finish<W: Write>(mut writer: csv::Writer<W>) -> BudgetResult<()> {
    writer
        .flush()
        .map_err(|e| BudgetError::Export(format!("Failed to write CSV: {}", e)))
}

/// Export projection events (master or ideal)
pub fn export_projection_csv<W: Write>(
    events: &[ProjectionEvent],
    date_format: &str,
    writer: W,
) -> BudgetResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Date", "Description", "Amount", "Category", "Balance", "Note"])?;
    for event in events {
        csv.write_record([
            event.date.format(date_format).to_string(),
            event.description.clone(),
            amount(event.amount),
            event.category.clone(),
            amount(event.balance),
            event.note.clone(),
        ])?;
    }
    finish(csv)
}

/// Export quarterly and yearly summaries in one table.
///
/// Yearly rows leave the quarter blank.
pub fn export_summary_csv<W: Write>(
    quarterly: &[QuarterSummary],
    yearly: &[YearSummary],
    writer: W,
) -> BudgetResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Category", "Quarter", "Planned", "Spent", "Remaining"])?;
    for row in quarterly {
        csv.write_record([
            row.category.clone(),
            format!("Q{}", row.quarter),
            amount(row.planned),
            amount(row.spent),
            amount(row.remaining),
        ])?;
    }
    for row in yearly {
        csv.write_record([
            row.category.clone(),
            String::new(),
            amount(row.planned),
            amount(row.spent),
            amount(row.remaining),
        ])?;
    }
    finish(csv)
}

pub fn export_remaining_csv<W: Write>(table: &RemainingExpenseTable, writer: W) -> BudgetResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut header = vec!["Category".to_string()];
    header.extend(table.years.iter().map(|y| y.to_string()));
    csv.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.category.clone()];
        record.extend(row.amounts.iter().map(|v| amount(*v)));
        csv.write_record(&record)?;
    }
    finish(csv)
}

pub fn export_balances_csv<W: Write>(balances: &ProjectionBalances, writer: W) -> BudgetResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Year", "Balance"])?;
    for row in &balances.year_end {
        csv.write_record([row.year.to_string(), amount(row.balance)])?;
    }
    csv.write_record(["Ideal".to_string(), amount(balances.ideal_final)])?;
    finish(csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::json::tests::sample_report;

    fn render<F>(f: F) -> Vec<String>
    where
        F: FnOnce(&mut Vec<u8>) -> BudgetResult<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_projection_csv() {
        let report = sample_report();
        let lines = render(|w| export_projection_csv(&report.projection, "%m/%d/%Y", w));
        assert_eq!(lines[0], "Date,Description,Amount,Category,Balance,Note");
        assert_eq!(lines.len(), report.projection.len() + 1);
        assert!(lines[1].starts_with("01/31/2025,Groceries total for Month 1 2025,-380.00"));
    }

    #[test]
    fn test_summary_csv() {
        let report = sample_report();
        let lines = render(|w| {
            export_summary_csv(&report.quarterly_summary, &report.yearly_summary, w)
        });
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "Groceries,Q1,-1200.00,-380.00,-800.00");
    }

    #[test]
    fn test_remaining_and_balances_csv() {
        let report = sample_report();
        let remaining = render(|w| export_remaining_csv(&report.remaining_expenses, w));
        assert_eq!(remaining[0], "Category,2025,2026,2027,2028,2029");

        let balances = render(|w| export_balances_csv(&report.balances, w));
        assert_eq!(balances.len(), 8);
        assert!(balances[7].starts_with("Ideal,"));
    }
}
