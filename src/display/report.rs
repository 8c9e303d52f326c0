//! Report formatting for terminal output

use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::ProjectionEvent;
use crate::services::{
    BudgetReport, ProjectionBalances, QuarterSummary, RemainingExpenseTable, YearSummary,
};

/// Format an amount with two decimals
pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[derive(Tabled)]
struct ProjectionLine {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

#[derive(Tabled)]
struct QuarterLine {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Quarter")]
    quarter: String,
    #[tabled(rename = "Planned")]
    planned: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

#[derive(Tabled)]
struct YearLine {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Planned")]
    planned: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

#[derive(Tabled)]
struct BalanceLine {
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

fn modern(mut table: Table) -> String {
    table.with(Style::modern());
    table.to_string()
}

/// Projection events with their running balance
pub fn format_projection(title: &str, events: &[ProjectionEvent], date_format: &str) -> String {
    if events.is_empty() {
        return format!("{}: no events.\n", title);
    }

    let lines = events.iter().map(|e| ProjectionLine {
        date: e.date.format(date_format).to_string(),
        description: e.description.clone(),
        amount: money(e.amount),
        balance: money(e.balance),
    });
    format!("{}\n{}\n", title, modern(Table::new(lines)))
}

/// Quarterly and yearly summaries
pub fn format_summary(quarterly: &[QuarterSummary], yearly: &[YearSummary]) -> String {
    let mut output = String::new();

    if quarterly.is_empty() {
        output.push_str("No quarterly or monthly budgets.\n");
    } else {
        let lines = quarterly.iter().map(|r| QuarterLine {
            category: r.category.clone(),
            quarter: format!("Q{}", r.quarter),
            planned: money(r.planned),
            spent: money(r.spent),
            remaining: money(r.remaining),
        });
        output.push_str(&format!("Quarterly Summary\n{}\n", modern(Table::new(lines))));
    }

    if yearly.is_empty() {
        output.push_str("No yearly budgets.\n");
    } else {
        let lines = yearly.iter().map(|r| YearLine {
            category: r.category.clone(),
            planned: money(r.planned),
            spent: money(r.spent),
            remaining: money(r.remaining),
        });
        output.push_str(&format!("Yearly Summary\n{}\n", modern(Table::new(lines))));
    }

    output
}

/// Remaining expense per category and year
pub fn format_remaining(table: &RemainingExpenseTable) -> String {
    let mut builder = Builder::default();
    let mut header = vec!["Category".to_string()];
    header.extend(table.years.iter().map(|y| y.to_string()));
    builder.push_record(header);

    for row in &table.rows {
        let mut record = vec![row.category.clone()];
        record.extend(row.amounts.iter().map(|v| money(*v)));
        builder.push_record(record);
    }

    format!("Remaining Expenses\n{}\n", modern(builder.build()))
}

/// Year-end balances and the ideal final balance
pub fn format_balances(balances: &ProjectionBalances) -> String {
    let lines = balances
        .year_end
        .iter()
        .map(|b| BalanceLine {
            year: b.year.to_string(),
            balance: money(b.balance),
        })
        .chain(std::iter::once(BalanceLine {
            year: "Ideal".to_string(),
            balance: money(balances.ideal_final),
        }));
    format!("Projected Balances\n{}\n", modern(Table::new(lines)))
}

/// What an update found: missing and empty budgets, out-of-balance
/// categories, and projected year-end balances
pub fn format_run_summary(report: &BudgetReport) -> String {
    let mut output = format!(
        "Budget {} as of {}: {} categories, {} projection events\n",
        report.year,
        report.as_of,
        report.budgets.len(),
        report.projection.len()
    );

    let list = |label: &str, items: &[String]| {
        if items.is_empty() {
            format!("{}: none\n", label)
        } else {
            format!("{}: {}\n", label, items.join(", "))
        }
    };
    output.push_str(&list("Missing budgets", &report.missing_budgets));
    output.push_str(&list("Empty budgets", &report.empty_budgets));

    if report.out_of_balance.is_empty() {
        output.push_str("Out of balance: none\n");
    } else {
        output.push_str("Out of balance:\n");
        for entry in &report.out_of_balance {
            output.push_str(&format!("  {:<24} {:>12}\n", entry.category, money(entry.difference)));
        }
    }

    output.push_str(&format_balances(&report.balances));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{OutOfBalance, YearEndBalance};
    use chrono::NaiveDate;

    #[test]
    fn test_format_projection() {
        let mut event = ProjectionEvent::new(
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            "Paycheck total for January 2025",
            3000.0,
            "Paycheck",
        );
        event.balance = 3500.0;

        let output = format_projection("Projection", &[event], "%m/%d/%Y");
        assert!(output.starts_with("Projection\n"));
        assert!(output.contains("01/31/2025"));
        assert!(output.contains("3000.00"));
        assert!(output.contains("3500.00"));

        assert_eq!(format_projection("Ideal", &[], "%m/%d/%Y"), "Ideal: no events.\n");
    }

    #[test]
    fn test_format_summary() {
        let quarterly = vec![QuarterSummary {
            category: "Clothes".into(),
            quarter: 2,
            planned: -300.0,
            spent: -120.0,
            remaining: -180.0,
        }];
        let output = format_summary(&quarterly, &[]);
        assert!(output.contains("Quarterly Summary"));
        assert!(output.contains("Q2"));
        assert!(output.contains("-180.00"));
        assert!(output.contains("No yearly budgets."));
    }

    #[test]
    fn test_format_remaining() {
        let table = RemainingExpenseTable {
            years: vec![2025, 2026],
            rows: vec![crate::services::summary::RemainingExpenseRow {
                category: "Insurance".into(),
                amounts: vec![-600.0, -1200.0],
            }],
        };
        let output = format_remaining(&table);
        assert!(output.contains("2026"));
        assert!(output.contains("-1200.00"));
    }

    #[test]
    fn test_format_balances() {
        let balances = ProjectionBalances {
            year_end: vec![YearEndBalance {
                year: 2025,
                balance: 812.5,
            }],
            ideal_final: -40.0,
        };
        let output = format_balances(&balances);
        assert!(output.contains("812.50"));
        assert!(output.contains("Ideal"));
        assert!(output.contains("-40.00"));
    }

    #[test]
    fn test_format_run_summary() {
        let mut report = crate::export::json::tests::sample_report();
        report.missing_budgets = vec!["Paycheck".into()];
        report.out_of_balance = vec![OutOfBalance {
            category: "Utilities".into(),
            difference: -12.34,
        }];

        let output = format_run_summary(&report);
        assert!(output.starts_with("Budget 2025 as of 2025-02-10: 1 categories"));
        assert!(output.contains("Missing budgets: Paycheck\n"));
        assert!(output.contains("Empty budgets: none\n"));
        assert!(output.contains("Utilities"));
        assert!(output.contains("-12.34"));
        assert!(output.contains("Projected Balances"));
    }
}
