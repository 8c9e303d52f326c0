//! Monthly Overview Report
//!
//! Category-by-month grid of projected cash flow for one year, with a
//! per-category yearly total and a per-month total row.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::error::{BudgetError, BudgetResult};
use crate::models::dates::{month_ends_of_year, month_name};
use crate::models::{Column, Sheet};
use crate::services::sums::{month_value, MonthSum};

const CATEGORY: &str = "Category";
const YEARLY: &str = "Yearly";
const MONTHLY_TOTAL: &str = "Monthly Total";

/// One category's twelve months
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewRow {
    pub category: String,
    pub months: [f64; 12],
    pub total: f64,
}

/// Monthly overview for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyOverview {
    pub year: i32,
    pub rows: Vec<OverviewRow>,
    pub totals: [f64; 12],
    pub grand_total: f64,
}

impl MonthlyOverview {
    /// Build the grid from per-category monthly sums, rows in `order`.
    /// Categories without sums are skipped.
    pub fn generate(year: i32, sums: &BTreeMap<String, Vec<MonthSum>>, order: &[String]) -> Self {
        let month_ends = month_ends_of_year(year);
        let mut totals = [0.0; 12];

        let rows: Vec<OverviewRow> = order
            .iter()
            .filter_map(|category| sums.get(category).map(|s| (category, s)))
            .map(|(category, category_sums)| {
                let mut months = [0.0; 12];
                for (i, end) in month_ends.iter().enumerate() {
                    months[i] = month_value(category_sums, *end);
                    totals[i] += months[i];
                }
                OverviewRow {
                    category: category.clone(),
                    months,
                    total: months.iter().sum(),
                }
            })
            .collect();

        Self {
            year,
            grand_total: totals.iter().sum(),
            rows,
            totals,
        }
    }

    /// Column headers for the months ("January 2025")
    pub fn month_headers(&self) -> Vec<String> {
        month_ends_of_year(self.year)
            .into_iter()
            .map(header_for)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as a workbook sheet; the last row is the monthly total
    pub fn to_sheet(&self, name: &str) -> Sheet {
        let mut sheet = Sheet::new(name).with_column(Column::texts(
            CATEGORY,
            self.rows
                .iter()
                .map(|r| r.category.clone())
                .chain(std::iter::once(MONTHLY_TOTAL.to_string())),
        ));
        for (i, header) in self.month_headers().into_iter().enumerate() {
            sheet.columns.push(Column::numbers(
                header,
                self.rows
                    .iter()
                    .map(|r| r.months[i])
                    .chain(std::iter::once(self.totals[i])),
            ));
        }
        sheet.columns.push(Column::numbers(
            YEARLY,
            self.rows
                .iter()
                .map(|r| r.total)
                .chain(std::iter::once(self.grand_total)),
        ));
        sheet
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut builder = Builder::default();

        let mut header = vec![CATEGORY.to_string()];
        header.extend(self.month_headers().iter().map(|h| short_header(h)));
        header.push(YEARLY.to_string());
        builder.push_record(header);

        for row in &self.rows {
            let mut record = vec![row.category.clone()];
            record.extend(row.months.iter().map(|v| format!("{:.2}", v)));
            record.push(format!("{:.2}", row.total));
            builder.push_record(record);
        }

        let mut total = vec![MONTHLY_TOTAL.to_string()];
        total.extend(self.totals.iter().map(|v| format!("{:.2}", v)));
        total.push(format!("{:.2}", self.grand_total));
        builder.push_record(total);

        let mut table = builder.build();
        table.with(Style::modern());
        format!("Monthly Overview: {}\n{}\n", self.year, table)
    }

    /// Export the grid to CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> BudgetResult<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec![CATEGORY.to_string()];
        header.extend(self.month_headers());
        header.push(YEARLY.to_string());
        csv.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.category.clone()];
            record.extend(row.months.iter().map(|v| format!("{:.2}", v)));
            record.push(format!("{:.2}", row.total));
            csv.write_record(&record)?;
        }

        let mut total = vec![MONTHLY_TOTAL.to_string()];
        total.extend(self.totals.iter().map(|v| format!("{:.2}", v)));
        total.push(format!("{:.2}", self.grand_total));
        csv.write_record(&total)?;

        csv.flush()
            .map_err(|e| BudgetError::Export(format!("Failed to write CSV: {}", e)))
    }
}

fn header_for(end: NaiveDate) -> String {
    format!("{} {}", month_name(end), end.year())
}

/// "January 2025" -> "Jan"
fn short_header(header: &str) -> String {
    header.chars().take(3).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn overview() -> MonthlyOverview {
        let mut sums = BTreeMap::new();
        sums.insert(
            "Groceries".to_string(),
            vec![(d(2024, 12, 31), -999.0), (d(2025, 1, 31), -300.0), (d(2025, 2, 28), -200.0)],
        );
        sums.insert("Paycheck".to_string(), vec![(d(2025, 1, 31), 3000.0)]);
        let order = vec![
            "Paycheck".to_string(),
            "Mortgage".to_string(),
            "Groceries".to_string(),
        ];
        MonthlyOverview::generate(2025, &sums, &order)
    }

    #[test]
    fn test_generate_follows_order_and_skips_missing() {
        let overview = overview();
        let names: Vec<&str> = overview.rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["Paycheck", "Groceries"]);

        let groceries = &overview.rows[1];
        assert_eq!(groceries.months[0], -300.0);
        assert_eq!(groceries.months[1], -200.0);
        // December of the prior year is outside the grid
        assert_eq!(groceries.total, -500.0);

        assert_eq!(overview.totals[0], 2700.0);
        assert_eq!(overview.grand_total, 2500.0);
    }

    #[test]
    fn test_to_sheet_layout() {
        let sheet = overview().to_sheet("Monthly");
        assert_eq!(sheet.columns.len(), 14);
        assert_eq!(sheet.columns[1].header, "January 2025");
        assert_eq!(sheet.columns[13].header, "Yearly");
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.cell("Category", 2).as_text(), "Monthly Total");
        assert_eq!(sheet.cell("Yearly", 2).as_amount(), 2500.0);
    }

    #[test]
    fn test_format_terminal() {
        let output = overview().format_terminal();
        assert!(output.contains("Monthly Overview: 2025"));
        assert!(output.contains("Groceries"));
        assert!(output.contains("Monthly Total"));
        assert!(output.contains("2500.00"));
    }

    #[test]
    fn test_export_csv() {
        let mut buffer = Vec::new();
        overview().export_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Category,January 2025,February 2025"));
        assert!(lines[3].starts_with("Monthly Total,2700.00,-200.00"));
    }
}
