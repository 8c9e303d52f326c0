//! Workbook rendering
//!
//! Builds the workbook written back after an update: derived report sheets,
//! the workbook-level tables, untouched excluded sheets, and one annotated
//! ledger per non-empty category.

use crate::config::settings::Settings;
use crate::models::expense::EXPENSES_SHEET;
use crate::models::projection::events_to_sheet;
use crate::models::workbook::{BALANCES_SHEET, CATEGORIES_SHEET};
use crate::models::{CellValue, Column, Sheet, Workbook};
use crate::services::{
    BudgetReport, OutOfBalance, ProjectionBalances, QuarterSummary, RemainingExpenseTable,
    YearSummary,
};

pub const DIFFS_SHEET: &str = "Diffs";
pub const Q_SUMMARY_SHEET: &str = "Q Summary";
pub const Y_SUMMARY_SHEET: &str = "Y Summary";
pub const YEARLY_REMAINING_SHEET: &str = "Yearly Remaining";
pub const PROJECTION_SHEET: &str = "Projection";
pub const IDEAL_PROJECTION_SHEET: &str = "Ideal Projection";
pub const PROJECTION_BALANCES_SHEET: &str = "Projection Balances";
pub const MONTHLY_SHEET: &str = "Monthly";
pub const IDEAL_MONTHLY_SHEET: &str = "Ideal Monthly";

const DERIVED: [&str; 9] = [
    DIFFS_SHEET,
    Q_SUMMARY_SHEET,
    Y_SUMMARY_SHEET,
    YEARLY_REMAINING_SHEET,
    PROJECTION_SHEET,
    IDEAL_PROJECTION_SHEET,
    PROJECTION_BALANCES_SHEET,
    MONTHLY_SHEET,
    IDEAL_MONTHLY_SHEET,
];

/// Render the updated workbook.
///
/// Empty budgets are left out, and so are missing budgets: they stay
/// missing until a ledger sheet is added. Excluded sheets the run does not produce
/// (Savings, Credit Card, ...) are carried over unchanged.
pub fn render_workbook(source: &Workbook, report: &BudgetReport, settings: &Settings) -> Workbook {
    let fmt = settings.date_format.as_str();

    let mut sheets = vec![
        diffs_sheet(&report.out_of_balance),
        quarter_summary_sheet(&report.quarterly_summary),
        year_summary_sheet(&report.yearly_summary),
        remaining_sheet(&report.remaining_expenses),
        events_to_sheet(PROJECTION_SHEET, &report.projection, fmt),
        events_to_sheet(IDEAL_PROJECTION_SHEET, &report.ideal_projection, fmt),
        balances_sheet(&report.balances),
        report.monthly.to_sheet(MONTHLY_SHEET),
        report.ideal_monthly.to_sheet(IDEAL_MONTHLY_SHEET),
        source
            .sheet(BALANCES_SHEET)
            .cloned()
            .unwrap_or_else(|| Sheet::new(BALANCES_SHEET)),
        report.expenses.to_sheet(),
        report.types.to_sheet(),
    ];

    let rewritten = [BALANCES_SHEET, EXPENSES_SHEET, CATEGORIES_SHEET];
    sheets.extend(
        source
            .sheets
            .iter()
            .filter(|s| settings.is_excluded(&s.name))
            .filter(|s| !DERIVED.contains(&s.name.as_str()) && !rewritten.contains(&s.name.as_str()))
            .cloned(),
    );

    sheets.extend(
        report
            .non_empty_budgets()
            .filter(|b| !report.missing_budgets.contains(&b.category))
            .map(|b| b.to_sheet(fmt)),
    );
    Workbook::new(sheets)
}

fn diffs_sheet(diffs: &[OutOfBalance]) -> Sheet {
    Sheet::new(DIFFS_SHEET)
        .with_column(Column::texts("Category", diffs.iter().map(|d| d.category.clone())))
        .with_column(Column::numbers("Difference", diffs.iter().map(|d| d.difference)))
}

fn quarter_summary_sheet(rows: &[QuarterSummary]) -> Sheet {
    Sheet::new(Q_SUMMARY_SHEET)
        .with_column(Column::texts("Category", rows.iter().map(|r| r.category.clone())))
        .with_column(Column::numbers("Quarter", rows.iter().map(|r| f64::from(r.quarter))))
        .with_column(Column::numbers("Planned", rows.iter().map(|r| r.planned)))
        .with_column(Column::numbers("Spent", rows.iter().map(|r| r.spent)))
        .with_column(Column::numbers("Remaining", rows.iter().map(|r| r.remaining)))
}

fn year_summary_sheet(rows: &[YearSummary]) -> Sheet {
    Sheet::new(Y_SUMMARY_SHEET)
        .with_column(Column::texts("Category", rows.iter().map(|r| r.category.clone())))
        .with_column(Column::numbers("Planned", rows.iter().map(|r| r.planned)))
        .with_column(Column::numbers("Spent", rows.iter().map(|r| r.spent)))
        .with_column(Column::numbers("Remaining", rows.iter().map(|r| r.remaining)))
}

fn remaining_sheet(table: &RemainingExpenseTable) -> Sheet {
    let mut sheet = Sheet::new(YEARLY_REMAINING_SHEET).with_column(Column::texts(
        "Category",
        table.rows.iter().map(|r| r.category.clone()),
    ));
    for (i, year) in table.years.iter().enumerate() {
        sheet.columns.push(Column::numbers(
            year.to_string(),
            table.rows.iter().map(|r| r.amounts.get(i).copied().unwrap_or(0.0)),
        ));
    }
    sheet
}

fn balances_sheet(balances: &ProjectionBalances) -> Sheet {
    let years = balances
        .year_end
        .iter()
        .map(|b| CellValue::Number(f64::from(b.year)))
        .chain(std::iter::once(CellValue::text("Ideal")))
        .collect();
    Sheet::new(PROJECTION_BALANCES_SHEET)
        .with_column(Column::new("Year", years))
        .with_column(Column::numbers(
            "Balance",
            balances
                .year_end
                .iter()
                .map(|b| b.balance)
                .chain(std::iter::once(balances.ideal_final)),
        ))
}
