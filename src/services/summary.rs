//! Category summary aggregation
//!
//! Roll-ups over parsed ledgers: out-of-balance differences, quarterly and
//! yearly summaries, and the multi-year remaining-expense table.

use std::collections::BTreeSet;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::dates::QUARTER_MONTHS;
use crate::models::{CategoryTypes, ParsedLedger, SummaryClass};
use crate::services::parser::ParsedBudget;

/// Category always listed right after the priority categories
const INTEREST: &str = "Interest";

/// Years covered by the remaining-expense table, starting at the budget year
pub const REMAINING_YEARS: i32 = 5;

/// A category whose actual spending disagrees with its reconciled rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutOfBalance {
    pub category: String,
    pub difference: f64,
}

/// One quarter of a Quarterly or Monthly category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterSummary {
    pub category: String,
    /// 1-based quarter number
    pub quarter: u8,
    pub planned: f64,
    pub spent: f64,
    pub remaining: f64,
}

/// Annual roll-up of a Yearly category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub category: String,
    pub planned: f64,
    pub spent: f64,
    pub remaining: f64,
}

/// Remaining expense per category for consecutive years
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemainingExpenseTable {
    pub years: Vec<i32>,
    pub rows: Vec<RemainingExpenseRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemainingExpenseRow {
    pub category: String,
    /// One amount per entry of [`RemainingExpenseTable::years`]
    pub amounts: Vec<f64>,
}

/// Order categories for reports: priority categories, Interest, then loan,
/// yearly, quarterly and monthly categories (each sorted), then the rest sorted.
pub fn report_order<'a>(
    categories: impl IntoIterator<Item = &'a str>,
    types: &CategoryTypes,
    priority: &[String],
) -> Vec<String> {
    let present: BTreeSet<&str> = categories.into_iter().collect();
    let mut ordered: Vec<String> = Vec::new();
    let push = |name: &str, ordered: &mut Vec<String>| {
        if present.contains(name) && !ordered.iter().any(|o| o == name) {
            ordered.push(name.to_string());
        }
    };

    for name in priority {
        push(name.as_str(), &mut ordered);
    }
    push(INTEREST, &mut ordered);
    for set in [&types.loan, &types.yearly, &types.quarterly, &types.monthly] {
        for name in set {
            push(name.as_str(), &mut ordered);
        }
    }
    for name in &present {
        push(*name, &mut ordered);
    }
    ordered
}

/// Summed differences of Loan, Yearly and Other ledgers whose magnitude
/// exceeds `tolerance`
pub fn out_of_balance(budgets: &[ParsedBudget], tolerance: f64) -> Vec<OutOfBalance> {
    let mut diffs: Vec<OutOfBalance> = budgets
        .iter()
        .filter_map(|b| {
            b.ledger.table().map(|table| OutOfBalance {
                category: b.category.clone(),
                difference: table.difference_total(),
            })
        })
        .filter(|d| d.difference.abs() > tolerance)
        .collect();
    diffs.sort_by(|a, b| a.category.cmp(&b.category));
    diffs
}

/// Per-quarter plan, spending and remaining budget of Quarterly and Monthly
/// categories. Monthly categories sum their three months per quarter.
pub fn quarterly_summary(budgets: &[ParsedBudget]) -> Vec<QuarterSummary> {
    let mut rows = Vec::new();
    for budget in budgets {
        match &budget.ledger {
            ParsedLedger::Quarterly { plan, status } => {
                for q in 0..4 {
                    rows.push(QuarterSummary {
                        category: budget.category.clone(),
                        quarter: q as u8 + 1,
                        planned: plan.planned[q],
                        spent: status.spent[q],
                        remaining: status.remaining[q],
                    });
                }
            }
            ParsedLedger::Monthly { plan, status } => {
                for (q, months) in QUARTER_MONTHS.iter().enumerate() {
                    let sum = |values: &[f64; 12]| -> f64 {
                        months.iter().map(|m| values[*m as usize - 1]).sum()
                    };
                    rows.push(QuarterSummary {
                        category: budget.category.clone(),
                        quarter: q as u8 + 1,
                        planned: sum(&plan.planned),
                        spent: sum(&status.spent),
                        remaining: sum(&status.remaining),
                    });
                }
            }
            _ => {}
        }
    }
    rows
}

/// Annual plan, spending and remaining budget of Yearly categories
pub fn yearly_summary(budgets: &[ParsedBudget], types: &CategoryTypes) -> Vec<YearSummary> {
    budgets
        .iter()
        .filter(|b| types.summary_class(&b.category) == SummaryClass::Yearly)
        .filter_map(|b| match &b.ledger {
            ParsedLedger::Default {
                ledger,
                table,
                remaining,
            } => Some(YearSummary {
                category: b.category.clone(),
                planned: ledger.rows.iter().map(|r| r.amount).sum(),
                spent: table.actual_total(),
                remaining: remaining.unwrap_or(0.0),
            }),
            _ => None,
        })
        .collect()
}

/// Estimated remaining expense per category for `year ..= year + 4`.
///
/// The budget year uses the ledger's remaining budget where it keeps one,
/// otherwise the rows dated in that year. Later years use the Next Year
/// amounts plus rows dated in that specific year, falling back to the
/// current plan when both are zero.
pub fn remaining_expenses(budgets: &[ParsedBudget], year: i32) -> RemainingExpenseTable {
    let years: Vec<i32> = (year..year + REMAINING_YEARS).collect();
    let rows = budgets
        .iter()
        .map(|budget| RemainingExpenseRow {
            category: budget.category.clone(),
            amounts: years
                .iter()
                .map(|y| {
                    if *y == year {
                        current_year_remaining(&budget.ledger, year)
                    } else {
                        future_year_remaining(&budget.ledger, *y)
                    }
                })
                .collect(),
        })
        .collect();
    RemainingExpenseTable { years, rows }
}

fn dated_in(ledger: &ParsedLedger, year: i32) -> f64 {
    ledger
        .rows()
        .iter()
        .filter(|r| r.date.year() == year)
        .map(|r| r.amount)
        .sum()
}

fn current_year_remaining(ledger: &ParsedLedger, year: i32) -> f64 {
    match ledger {
        ParsedLedger::Quarterly { status, .. } => status.remaining.iter().sum(),
        ParsedLedger::Monthly { status, .. } => status.remaining.iter().sum(),
        ParsedLedger::Default {
            remaining: Some(remaining),
            ..
        } => *remaining,
        ParsedLedger::Loan { .. } | ParsedLedger::Default { .. } => dated_in(ledger, year),
    }
}

fn future_year_remaining(ledger: &ParsedLedger, year: i32) -> f64 {
    let (baseline, fallback) = match ledger {
        ParsedLedger::Quarterly { plan, .. } => (plan.next_year_total(), plan.planned_total()),
        ParsedLedger::Monthly { plan, .. } => (plan.next_year_total(), plan.planned_total()),
        ParsedLedger::Loan { .. } | ParsedLedger::Default { .. } => {
            (ledger.rows().iter().map(|r| r.next_year).sum(), 0.0)
        }
    };
    let specific = dated_in(ledger, year);

    if baseline == 0.0 && specific == 0.0 {
        fallback
    } else {
        baseline + specific
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DatedLedger, LedgerRow, MonthlyRow, MonthlyStatus, MonthlyTable, PeriodPlan,
        QuarterlyStatus,
    };
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn budget(category: &str, ledger: ParsedLedger) -> ParsedBudget {
        ParsedBudget {
            category: category.to_string(),
            ledger,
            year_projection: Vec::new(),
            forecast: Vec::new(),
        }
    }

    fn table(differences: &[f64]) -> MonthlyTable {
        MonthlyTable {
            rows: differences
                .iter()
                .enumerate()
                .map(|(i, diff)| MonthlyRow {
                    end_of_month: crate::models::dates::month_ends_of_year(2025)[i],
                    actual: *diff,
                    reconciled: 0.0,
                    difference: *diff,
                    planned: 0.0,
                })
                .collect(),
        }
    }

    fn types() -> CategoryTypes {
        let mut types = CategoryTypes::default();
        types.loan.insert("CarLoan".into());
        types.yearly.insert("Insurance".into());
        types.quarterly.insert("Clothes".into());
        types.monthly.insert("Groceries".into());
        types
    }

    #[test]
    fn test_report_order() {
        let categories = ["Zoo", "Groceries", "Interest", "Taxes", "CarLoan", "Clothes", "Apples", "Insurance"];
        let priority = vec!["Paycheck".to_string(), "Taxes".to_string()];
        let order = report_order(categories, &types(), &priority);
        assert_eq!(
            order,
            vec!["Taxes", "Interest", "CarLoan", "Insurance", "Clothes", "Groceries", "Apples", "Zoo"]
        );
    }

    #[test]
    fn test_out_of_balance_respects_tolerance() {
        let budgets = vec![
            budget(
                "CarLoan",
                ParsedLedger::Loan {
                    ledger: DatedLedger::default(),
                    table: table(&[-20.0, 5.0]),
                },
            ),
            budget(
                "Gifts",
                ParsedLedger::Default {
                    ledger: DatedLedger::default(),
                    table: table(&[0.005]),
                    remaining: None,
                },
            ),
            budget(
                "Clothes",
                ParsedLedger::Quarterly {
                    plan: PeriodPlan::default(),
                    status: QuarterlyStatus::default(),
                },
            ),
        ];
        let diffs = out_of_balance(&budgets, 0.01);
        assert_eq!(
            diffs,
            vec![OutOfBalance {
                category: "CarLoan".into(),
                difference: -15.0
            }]
        );
    }

    #[test]
    fn test_quarterly_summary_sums_monthly_quarters() {
        let mut spent = [0.0; 12];
        spent[0] = -100.0;
        spent[2] = -50.0;
        let budgets = vec![budget(
            "Groceries",
            ParsedLedger::Monthly {
                plan: PeriodPlan::new([-400.0; 12], [0.0; 12]),
                status: MonthlyStatus {
                    spent,
                    remaining: [-400.0; 12],
                    variance: [0.0; 12],
                },
            },
        )];
        let rows = quarterly_summary(&budgets);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].quarter, 1);
        assert_eq!(rows[0].planned, -1200.0);
        assert_eq!(rows[0].spent, -150.0);
        assert_eq!(rows[3].remaining, -1200.0);
    }

    #[test]
    fn test_yearly_summary() {
        let ledger = DatedLedger::new(vec![
            LedgerRow::new(d(2025, 3, 1), "Premium", -300.0).reconciled(),
            LedgerRow::new(d(2025, 12, 31), "Yearly", -600.0),
        ]);
        let budgets = vec![
            budget(
                "Insurance",
                ParsedLedger::Default {
                    ledger,
                    table: table(&[0.0, 0.0, -300.0]),
                    remaining: Some(-900.0),
                },
            ),
            budget(
                "Gifts",
                ParsedLedger::Default {
                    ledger: DatedLedger::default(),
                    table: table(&[-1.0]),
                    remaining: None,
                },
            ),
        ];
        let rows = yearly_summary(&budgets, &types());
        assert_eq!(
            rows,
            vec![YearSummary {
                category: "Insurance".into(),
                planned: -900.0,
                spent: -300.0,
                remaining: -900.0,
            }]
        );
    }

    #[test]
    fn test_remaining_expenses_cascade() {
        let loan = DatedLedger::new(vec![
            LedgerRow::new(d(2025, 11, 1), "Payment", -500.0).with_next_year(-6000.0),
            LedgerRow::new(d(2027, 6, 1), "Balloon", -2000.0),
        ]);
        let budgets = vec![
            budget(
                "CarLoan",
                ParsedLedger::Loan {
                    ledger: loan,
                    table: MonthlyTable::default(),
                },
            ),
            budget(
                "Clothes",
                ParsedLedger::Quarterly {
                    plan: PeriodPlan::new([-300.0; 4], [0.0; 4]),
                    status: QuarterlyStatus {
                        spent: [0.0; 4],
                        remaining: [0.0, -100.0, -300.0, -300.0],
                    },
                },
            ),
        ];

        let table = remaining_expenses(&budgets, 2025);
        assert_eq!(table.years, vec![2025, 2026, 2027, 2028, 2029]);

        let loan = &table.rows[0];
        assert_eq!(loan.amounts[0], -500.0);
        assert_eq!(loan.amounts[1], -6000.0);
        assert_eq!(loan.amounts[2], -8000.0);

        let clothes = &table.rows[1];
        assert_eq!(clothes.amounts[0], -700.0);
        // No Next Year plan: fall back to this year's plan
        assert_eq!(clothes.amounts[1], -1200.0);
    }
}
