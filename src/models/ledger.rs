//! Category ledgers
//!
//! A raw category sheet is resolved once, at classification time, into a
//! [`BudgetLedger`] whose variant fixes which columns exist. Parsing turns it
//! into a [`ParsedLedger`] carrying the computed columns, and only
//! [`ParsedLedger::to_sheet`] goes back to the column-oriented shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::CategoryType;
use super::cell::CellValue;
use super::sheet::{Column, Sheet};
use crate::error::{BudgetError, BudgetResult};

/// Column headers shared by ledgers and derived sheets
pub mod columns {
    pub const DATE: &str = "Date";
    pub const DESC: &str = "Desc.";
    pub const THIS_YEAR: &str = "This Year";
    pub const PAYMENT: &str = "Payment";
    pub const PLANNED: &str = "Planned";
    pub const RECONCILED_FLAG: &str = "R";
    pub const NEXT_YEAR: &str = "Next Year";
    pub const NOTE: &str = "Note";
    pub const END_OF_MONTH: &str = "End of Month";
    pub const ACTUAL: &str = "Actual";
    pub const RECONCILED: &str = "Reconciled";
    pub const DIFFERENCE: &str = "Difference";
    pub const REMAINING: &str = "Remaining";
    pub const SPENT: &str = "Spent";
    pub const VARIANCE: &str = "Spent - Yearly Planned";

    /// Columns the engine writes; never carried over from an input sheet
    pub const COMPUTED: [&str; 7] = [
        END_OF_MONTH,
        ACTUAL,
        RECONCILED,
        DIFFERENCE,
        REMAINING,
        SPENT,
        VARIANCE,
    ];
}

use columns::*;

/// Description of the synthetic leftover row appended to Yearly ledgers
pub const YEARLY_ROW: &str = "Yearly";

/// One dated ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub date: NaiveDate,
    pub description: String,
    /// "This Year" for Default ledgers, "Payment" for Loan ledgers
    pub amount: f64,
    /// Reconciled marker; any non-blank text marks the row as reconciled
    #[serde(default)]
    pub marker: String,
    #[serde(default)]
    pub next_year: f64,
    #[serde(default)]
    pub note: String,
}

impl LedgerRow {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            marker: String::new(),
            next_year: 0.0,
            note: String::new(),
        }
    }

    /// Mark the row reconciled
    pub fn reconciled(mut self) -> Self {
        self.marker = "x".to_string();
        self
    }

    pub fn with_next_year(mut self, next_year: f64) -> Self {
        self.next_year = next_year;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn is_reconciled(&self) -> bool {
        !self.marker.trim().is_empty()
    }
}

/// Rows of a Loan or Default ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatedLedger {
    pub rows: Vec<LedgerRow>,
}

impl DatedLedger {
    pub fn new(rows: Vec<LedgerRow>) -> Self {
        Self { rows }
    }

    /// Read rows from a sheet, taking amounts from `amount_column`.
    ///
    /// Rows without a date are dropped; a date that cannot be parsed, in
    /// `date_format` or a built-in format, is an error naming the sheet and row.
    pub fn from_sheet(sheet: &Sheet, amount_column: &str, date_format: &str) -> BudgetResult<Self> {
        let mut rows = Vec::new();
        for i in 0..sheet.row_count() {
            let date = sheet
                .cell(DATE, i)
                .as_date(i + 1, date_format)
                .map_err(|e| e.in_sheet(&sheet.name))?;
            let Some(date) = date else { continue };

            rows.push(LedgerRow {
                date,
                description: sheet.cell(DESC, i).as_text(),
                amount: sheet.cell(amount_column, i).as_amount(),
                marker: sheet.cell(RECONCILED_FLAG, i).as_text().trim().to_string(),
                next_year: sheet.cell(NEXT_YEAR, i).as_amount(),
                note: sheet.cell(NOTE, i).as_text(),
            });
        }
        Ok(Self { rows })
    }

    pub fn reconciled(&self) -> impl Iterator<Item = &LedgerRow> {
        self.rows.iter().filter(|r| r.is_reconciled())
    }

    pub fn forward(&self) -> impl Iterator<Item = &LedgerRow> {
        self.rows.iter().filter(|r| !r.is_reconciled())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The six ledger columns, amounts under `amount_column`
    pub fn to_columns(&self, amount_column: &str, date_format: &str) -> Vec<Column> {
        vec![
            Column::new(
                DATE,
                self.rows
                    .iter()
                    .map(|r| CellValue::date(r.date, date_format))
                    .collect(),
            ),
            Column::texts(DESC, self.rows.iter().map(|r| r.description.clone())),
            Column::numbers(amount_column, self.rows.iter().map(|r| r.amount)),
            Column::texts(RECONCILED_FLAG, self.rows.iter().map(|r| r.marker.clone())),
            Column::numbers(NEXT_YEAR, self.rows.iter().map(|r| r.next_year)),
            Column::texts(NOTE, self.rows.iter().map(|r| r.note.clone())),
        ]
    }
}

/// Fixed-period plan of a Quarterly (N = 4) or Monthly (N = 12) ledger
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodPlan<const N: usize> {
    /// "This Year" (Quarterly) or "Planned" (Monthly), per period
    pub planned: [f64; N],
    pub next_year: [f64; N],
    /// Input columns the engine does not interpret, kept for the output sheet
    pub passthrough: Vec<Column>,
}

impl<const N: usize> Default for PeriodPlan<N> {
    fn default() -> Self {
        Self {
            planned: [0.0; N],
            next_year: [0.0; N],
            passthrough: Vec::new(),
        }
    }
}

impl<const N: usize> PeriodPlan<N> {
    pub fn new(planned: [f64; N], next_year: [f64; N]) -> Self {
        Self {
            planned,
            next_year,
            passthrough: Vec::new(),
        }
    }

    /// Read a plan whose per-period amounts live in `plan_column`.
    /// Short columns are zero-padded; extra values are ignored.
    pub fn from_sheet(category: &str, sheet: &Sheet, plan_column: &'static str) -> BudgetResult<Self> {
        let planned = sheet
            .column(plan_column)
            .ok_or_else(|| BudgetError::missing_column(category, plan_column))?;
        let next_year = sheet
            .column(NEXT_YEAR)
            .ok_or_else(|| BudgetError::missing_column(category, NEXT_YEAR))?;

        let passthrough = sheet
            .columns
            .iter()
            .filter(|c| c.header != plan_column && c.header != NEXT_YEAR)
            .filter(|c| !COMPUTED.contains(&c.header.as_str()))
            .cloned()
            .collect();

        Ok(Self {
            planned: fixed(&planned.amounts()),
            next_year: fixed(&next_year.amounts()),
            passthrough,
        })
    }

    pub fn planned_total(&self) -> f64 {
        self.planned.iter().sum()
    }

    pub fn next_year_total(&self) -> f64 {
        self.next_year.iter().sum()
    }
}

/// Copy into a fixed-size array, zero-padding short input
fn fixed<const N: usize>(values: &[f64]) -> [f64; N] {
    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = *value;
    }
    out
}

/// A category ledger, typed by the category's budget type
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetLedger {
    Loan(DatedLedger),
    Quarterly(PeriodPlan<4>),
    Monthly(PeriodPlan<12>),
    Default(DatedLedger),
}

impl BudgetLedger {
    /// Resolve a raw category sheet into the ledger shape its type requires
    pub fn from_sheet(
        category: &str,
        kind: CategoryType,
        sheet: &Sheet,
        date_format: &str,
    ) -> BudgetResult<Self> {
        match kind {
            CategoryType::Loan => {
                if !sheet.has_column(PAYMENT) {
                    return Err(BudgetError::missing_column(category, PAYMENT));
                }
                Ok(Self::Loan(DatedLedger::from_sheet(sheet, PAYMENT, date_format)?))
            }
            CategoryType::Quarterly => Ok(Self::Quarterly(PeriodPlan::from_sheet(
                category, sheet, THIS_YEAR,
            )?)),
            CategoryType::Monthly => Ok(Self::Monthly(PeriodPlan::from_sheet(
                category, sheet, PLANNED,
            )?)),
            CategoryType::Default => {
                if sheet.is_blank() {
                    return Ok(Self::Default(DatedLedger::default()));
                }
                if !sheet.has_column(DATE) {
                    return Err(BudgetError::missing_column(category, DATE));
                }
                Ok(Self::Default(DatedLedger::from_sheet(sheet, THIS_YEAR, date_format)?))
            }
        }
    }
}

/// One month of the Actual / Reconciled / Difference / Planned table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub end_of_month: NaiveDate,
    pub actual: f64,
    pub reconciled: f64,
    pub difference: f64,
    pub planned: f64,
}

/// Month-by-month comparison of actual spending against the ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTable {
    pub rows: Vec<MonthlyRow>,
}

impl MonthlyTable {
    pub fn actual_total(&self) -> f64 {
        self.rows.iter().map(|r| r.actual).sum()
    }

    pub fn difference_total(&self) -> f64 {
        self.rows.iter().map(|r| r.difference).sum()
    }

    /// True when every Actual and Planned value is zero
    pub fn is_zero(&self) -> bool {
        self.rows.iter().all(|r| r.actual == 0.0 && r.planned == 0.0)
    }

    pub fn to_columns(&self, date_format: &str) -> Vec<Column> {
        vec![
            Column::new(
                END_OF_MONTH,
                self.rows
                    .iter()
                    .map(|r| CellValue::date(r.end_of_month, date_format))
                    .collect(),
            ),
            Column::numbers(ACTUAL, self.rows.iter().map(|r| r.actual)),
            Column::numbers(RECONCILED, self.rows.iter().map(|r| r.reconciled)),
            Column::numbers(DIFFERENCE, self.rows.iter().map(|r| r.difference)),
            Column::numbers(PLANNED, self.rows.iter().map(|r| r.planned)),
        ]
    }
}

/// Computed columns of a Quarterly ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyStatus {
    pub spent: [f64; 4],
    pub remaining: [f64; 4],
}

/// Computed columns of a Monthly ledger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStatus {
    pub spent: [f64; 12],
    pub remaining: [f64; 12],
    /// Spent minus planned, per month
    pub variance: [f64; 12],
}

/// A ledger with its computed columns
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLedger {
    Loan {
        ledger: DatedLedger,
        table: MonthlyTable,
    },
    Quarterly {
        plan: PeriodPlan<4>,
        status: QuarterlyStatus,
    },
    Monthly {
        plan: PeriodPlan<12>,
        status: MonthlyStatus,
    },
    Default {
        ledger: DatedLedger,
        table: MonthlyTable,
        /// Annual plan minus actual spending; only for Yearly categories
        remaining: Option<f64>,
    },
}

impl ParsedLedger {
    /// The monthly comparison table of dated ledgers
    pub fn table(&self) -> Option<&MonthlyTable> {
        match self {
            Self::Loan { table, .. } | Self::Default { table, .. } => Some(table),
            _ => None,
        }
    }

    /// Rows of dated ledgers
    pub fn rows(&self) -> &[LedgerRow] {
        match self {
            Self::Loan { ledger, .. } | Self::Default { ledger, .. } => &ledger.rows,
            _ => &[],
        }
    }

    /// True when nothing was planned and nothing was spent
    pub fn is_empty(&self) -> bool {
        let all_zero = |values: &[f64]| values.iter().all(|v| *v == 0.0);
        match self {
            Self::Loan { table, .. } | Self::Default { table, .. } => table.is_zero(),
            Self::Quarterly { plan, status } => {
                all_zero(&plan.planned) && all_zero(&plan.next_year) && all_zero(&status.spent)
            }
            Self::Monthly { plan, status } => {
                all_zero(&plan.planned) && all_zero(&plan.next_year) && all_zero(&status.spent)
            }
        }
    }

    /// Render the annotated ledger as a sheet named after the category
    pub fn to_sheet(&self, category: &str, date_format: &str) -> Sheet {
        let mut sheet = Sheet::new(category);
        match self {
            Self::Loan { ledger, table } => {
                sheet.columns.extend(ledger.to_columns(PAYMENT, date_format));
                sheet.columns.extend(table.to_columns(date_format));
            }
            Self::Default {
                ledger,
                table,
                remaining,
            } => {
                sheet.columns.extend(ledger.to_columns(THIS_YEAR, date_format));
                sheet.columns.extend(table.to_columns(date_format));
                if let Some(remaining) = remaining {
                    sheet.columns.push(Column::numbers(REMAINING, [*remaining]));
                }
            }
            Self::Quarterly { plan, status } => {
                sheet.columns.extend(plan.passthrough.iter().cloned());
                sheet.columns.push(Column::numbers(THIS_YEAR, plan.planned));
                sheet.columns.push(Column::numbers(NEXT_YEAR, plan.next_year));
                sheet.columns.push(Column::numbers(SPENT, status.spent));
                sheet.columns.push(Column::numbers(REMAINING, status.remaining));
            }
            Self::Monthly { plan, status } => {
                sheet.columns.extend(plan.passthrough.iter().cloned());
                sheet.columns.push(Column::numbers(PLANNED, plan.planned));
                sheet.columns.push(Column::numbers(NEXT_YEAR, plan.next_year));
                sheet.columns.push(Column::numbers(SPENT, status.spent));
                sheet.columns.push(Column::numbers(REMAINING, status.remaining));
                sheet.columns.push(Column::numbers(VARIANCE, status.variance));
            }
        }
        sheet.equalize();
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn loan_sheet() -> Sheet {
        Sheet::new("CarLoan")
            .with_column(Column::texts(DATE, ["01/15/2025", "02/15/2025", ""]))
            .with_column(Column::texts(DESC, ["Payment", "Payment", ""]))
            .with_column(Column::numbers(PAYMENT, [-500.0, -500.0]))
            .with_column(Column::texts(RECONCILED_FLAG, ["x"]))
    }

    #[test]
    fn test_loan_requires_payment() {
        let sheet = Sheet::new("CarLoan").with_column(Column::texts(DATE, ["01/15/2025"]));
        let err = BudgetLedger::from_sheet("CarLoan", CategoryType::Loan, &sheet, "%m/%d/%Y").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Budget 'CarLoan' is missing required column 'Payment'"
        );
    }

    #[test]
    fn test_loan_rows_drop_blank_dates() {
        let ledger = BudgetLedger::from_sheet("CarLoan", CategoryType::Loan, &loan_sheet(), "%m/%d/%Y").unwrap();
        let BudgetLedger::Loan(ledger) = ledger else {
            panic!("expected a loan ledger");
        };
        assert_eq!(ledger.rows.len(), 2);
        assert_eq!(ledger.rows[0].date, d(2025, 1, 15));
        assert_eq!(ledger.rows[0].amount, -500.0);
        assert!(ledger.rows[0].is_reconciled());
        assert!(!ledger.rows[1].is_reconciled());
        assert_eq!(ledger.reconciled().count(), 1);
        assert_eq!(ledger.forward().count(), 1);
    }

    #[test]
    fn test_default_requires_date_unless_blank() {
        let blank = Sheet::new("Gifts").with_column(Column::new(THIS_YEAR, vec![CellValue::Empty]));
        let ledger = BudgetLedger::from_sheet("Gifts", CategoryType::Default, &blank, "%m/%d/%Y").unwrap();
        assert_eq!(ledger, BudgetLedger::Default(DatedLedger::default()));

        let filled = Sheet::new("Gifts").with_column(Column::numbers(THIS_YEAR, [-50.0]));
        let err = BudgetLedger::from_sheet("Gifts", CategoryType::Default, &filled, "%m/%d/%Y").unwrap_err();
        assert!(matches!(err, BudgetError::MissingColumn { column: "Date", .. }));
    }

    #[test]
    fn test_bad_date_names_sheet() {
        let sheet = Sheet::new("Gifts")
            .with_column(Column::new(DATE, vec![CellValue::Number(45658.0)]))
            .with_column(Column::numbers(THIS_YEAR, [-50.0]));
        let err = BudgetLedger::from_sheet("Gifts", CategoryType::Default, &sheet, "%m/%d/%Y").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("sheet 'Gifts' row 1"), "{msg}");
    }

    #[test]
    fn test_period_plan_pads_and_keeps_passthrough() {
        let sheet = Sheet::new("Clothes")
            .with_column(Column::texts("Quarter", ["Q1", "Q2", "Q3", "Q4"]))
            .with_column(Column::numbers(THIS_YEAR, [-100.0, -200.0]))
            .with_column(Column::numbers(NEXT_YEAR, [-150.0; 4]))
            .with_column(Column::numbers(SPENT, [1.0, 2.0, 3.0, 4.0]));
        let BudgetLedger::Quarterly(plan) =
            BudgetLedger::from_sheet("Clothes", CategoryType::Quarterly, &sheet, "%m/%d/%Y").unwrap()
        else {
            panic!("expected a quarterly ledger");
        };
        assert_eq!(plan.planned, [-100.0, -200.0, 0.0, 0.0]);
        assert_eq!(plan.next_year_total(), -600.0);
        assert_eq!(plan.passthrough.len(), 1);
        assert_eq!(plan.passthrough[0].header, "Quarter");
    }

    #[test]
    fn test_monthly_requires_planned() {
        let sheet = Sheet::new("Groceries").with_column(Column::numbers(NEXT_YEAR, [0.0; 12]));
        let err = BudgetLedger::from_sheet("Groceries", CategoryType::Monthly, &sheet, "%m/%d/%Y").unwrap_err();
        assert!(matches!(err, BudgetError::MissingColumn { column: "Planned", .. }));
    }

    #[test]
    fn test_parsed_dated_ledger_round_trips_through_sheet() {
        let BudgetLedger::Loan(ledger) =
            BudgetLedger::from_sheet("CarLoan", CategoryType::Loan, &loan_sheet(), "%m/%d/%Y").unwrap()
        else {
            panic!("expected a loan ledger");
        };
        let table = MonthlyTable {
            rows: vec![
                MonthlyRow {
                    end_of_month: d(2025, 1, 31),
                    actual: -500.0,
                    reconciled: -500.0,
                    difference: 0.0,
                    planned: -500.0,
                },
                MonthlyRow {
                    end_of_month: d(2025, 2, 28),
                    actual: 0.0,
                    reconciled: 0.0,
                    difference: 0.0,
                    planned: -500.0,
                },
                MonthlyRow {
                    end_of_month: d(2025, 3, 31),
                    actual: 0.0,
                    reconciled: 0.0,
                    difference: 0.0,
                    planned: 0.0,
                },
            ],
        };
        let parsed = ParsedLedger::Loan {
            ledger: ledger.clone(),
            table,
        };
        let sheet = parsed.to_sheet("CarLoan", "%m/%d/%Y");
        assert_eq!(sheet.row_count(), 3);

        let reread = DatedLedger::from_sheet(&sheet, PAYMENT, "%m/%d/%Y").unwrap();
        assert_eq!(reread, ledger);
    }

    #[test]
    fn test_parsed_is_empty() {
        let parsed = ParsedLedger::Monthly {
            plan: PeriodPlan::default(),
            status: MonthlyStatus {
                spent: [0.0; 12],
                remaining: [0.0; 12],
                variance: [0.0; 12],
            },
        };
        assert!(parsed.is_empty());

        let parsed = ParsedLedger::Default {
            ledger: DatedLedger::default(),
            table: MonthlyTable {
                rows: vec![MonthlyRow {
                    end_of_month: d(2025, 1, 31),
                    actual: -20.0,
                    reconciled: 0.0,
                    difference: -20.0,
                    planned: 0.0,
                }],
            },
            remaining: None,
        };
        assert!(!parsed.is_empty());
    }
}
