//! Category budget parser
//!
//! Given one category's ledger and the actual transactions, applies the
//! budget type's accrual rules and produces the annotated ledger, the
//! category's events for the budget year and its five-year forecast.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::{BudgetError, BudgetResult};
use crate::models::dates::{
    end_of_year, month_ends_between, month_ends_of_year, month_name, quarter_ends_of_year,
};
use crate::models::ledger::YEARLY_ROW;
use crate::models::{
    BudgetLedger, CategoryTypes, DatedLedger, ExpensePlan, LedgerRow, MonthlyRow, MonthlyStatus,
    MonthlyTable, ParsedLedger, PeriodPlan, ProjectionEvent, Sheet, Transaction,
};
use crate::services::forecast::forecast;
use crate::services::sums::{
    monthly_sums, month_value, period_position, quarterly_sums, MonthSum, NextYearAmount,
    PlannedAmount,
};

/// Everything a category parse reads besides the ledger itself
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub types: &'a CategoryTypes,
    pub expenses: &'a ExpensePlan,
    pub transactions: &'a [Transaction],
    /// Budget year
    pub year: i32,
    /// The date treated as "today"
    pub as_of: NaiveDate,
    /// Configured strftime format of ledger Date cells
    pub date_format: &'a str,
}

/// Parser output for one category
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBudget {
    pub category: String,
    pub ledger: ParsedLedger,
    /// Dated events for the budget year
    pub year_projection: Vec<ProjectionEvent>,
    /// Seed series replicated one to five years ahead
    pub forecast: Vec<ProjectionEvent>,
}

impl ParsedBudget {
    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    pub fn to_sheet(&self, date_format: &str) -> Sheet {
        self.ledger.to_sheet(&self.category, date_format)
    }
}

/// Classify a category, resolve its raw sheet and parse it
pub fn parse_budget(
    category: &str,
    sheet: &Sheet,
    ctx: &ParseContext<'_>,
) -> BudgetResult<ParsedBudget> {
    let kind = ctx.types.classify(category);
    let yearly = ctx.types.is_yearly(category);
    debug!(category, %kind, yearly, "Parsing budget");

    let ledger = BudgetLedger::from_sheet(category, kind, sheet, ctx.date_format)?;
    parse_ledger(category, ledger, yearly, ctx)
}

/// Parse an already-resolved ledger. `yearly` applies only to Default ledgers.
pub fn parse_ledger(
    category: &str,
    ledger: BudgetLedger,
    yearly: bool,
    ctx: &ParseContext<'_>,
) -> BudgetResult<ParsedBudget> {
    let actual = monthly_sums(Some(category), ctx.transactions);

    let (ledger, year_projection, seed) = match ledger {
        BudgetLedger::Loan(ledger) => parse_loan(category, ledger, &actual, ctx.year),
        BudgetLedger::Quarterly(plan) => parse_quarterly(category, plan, ctx),
        BudgetLedger::Monthly(plan) => parse_monthly(category, plan, &actual, ctx),
        BudgetLedger::Default(ledger) => parse_default(category, ledger, yearly, &actual, ctx)?,
    };

    Ok(ParsedBudget {
        category: category.to_string(),
        ledger,
        year_projection,
        forecast: forecast(category, &seed),
    })
}

type Parsed = (ParsedLedger, Vec<ProjectionEvent>, Vec<MonthSum>);

fn parse_loan(category: &str, mut ledger: DatedLedger, actual: &[MonthSum], year: i32) -> Parsed {
    normalize_descriptions(&mut ledger, category);
    let table = monthly_table(&ledger, actual, year);
    let events = dated_projection(category, &ledger, actual);
    (ParsedLedger::Loan { ledger, table }, events, Vec::new())
}

fn parse_quarterly(category: &str, plan: PeriodPlan<4>, ctx: &ParseContext<'_>) -> Parsed {
    let status = quarterly_sums(
        Some(category),
        ctx.transactions,
        plan.planned,
        ctx.year,
        ctx.as_of,
    );
    let quarter_ends = quarter_ends_of_year(ctx.year);

    let mut events = Vec::new();
    for (q, end) in quarter_ends.iter().enumerate() {
        if status.spent[q] != 0.0 {
            events.push(ProjectionEvent::new(
                *end,
                format!("{} total for Quarter {} {}", category, q + 1, ctx.year),
                status.spent[q],
                category,
            ));
        }
        if status.remaining[q] != 0.0 {
            events.push(ProjectionEvent::new(
                *end,
                format!("Planned {} for Quarter {} {}", category, q + 1, ctx.year),
                status.remaining[q],
                category,
            ));
        }
    }

    let seed = quarter_ends.into_iter().zip(plan.next_year).collect();
    (ParsedLedger::Quarterly { plan, status }, events, seed)
}

fn parse_monthly(
    category: &str,
    plan: PeriodPlan<12>,
    actual: &[MonthSum],
    ctx: &ParseContext<'_>,
) -> Parsed {
    let month_ends = month_ends_of_year(ctx.year);
    let current = ctx.as_of.month0() as usize;

    let mut status = MonthlyStatus {
        spent: [0.0; 12],
        remaining: [0.0; 12],
        variance: [0.0; 12],
    };
    let mut events = Vec::new();

    for (m, end) in month_ends.iter().enumerate() {
        let spent = month_value(actual, *end);
        let planned = plan.planned[m];
        let remaining = match period_position(ctx.year, m, ctx.as_of.year(), current) {
            std::cmp::Ordering::Less => 0.0,
            std::cmp::Ordering::Equal => (planned - spent).min(0.0),
            std::cmp::Ordering::Greater => planned,
        };

        status.spent[m] = spent;
        status.remaining[m] = remaining;
        status.variance[m] = spent - planned;

        if spent != 0.0 {
            events.push(ProjectionEvent::new(
                *end,
                format!("{} total for Month {} {}", category, m + 1, ctx.year),
                spent,
                category,
            ));
        }
        if remaining != 0.0 {
            events.push(ProjectionEvent::new(
                *end,
                format!("Planned {} for {} {}", category, month_name(*end), ctx.year),
                remaining,
                category,
            ));
        }
    }

    let seed = month_ends.into_iter().zip(plan.next_year).collect();
    (ParsedLedger::Monthly { plan, status }, events, seed)
}

fn parse_default(
    category: &str,
    mut ledger: DatedLedger,
    yearly: bool,
    actual: &[MonthSum],
    ctx: &ParseContext<'_>,
) -> BudgetResult<Parsed> {
    normalize_descriptions(&mut ledger, category);

    let remaining = if yearly {
        Some(apply_yearly_plan(category, &mut ledger, actual, ctx)?)
    } else {
        None
    };

    let table = monthly_table(&ledger, actual, ctx.year);
    let events = dated_projection(category, &ledger, actual);
    let seed = monthly_sums(None, ledger.rows.iter().map(NextYearAmount));

    Ok((
        ParsedLedger::Default {
            ledger,
            table,
            remaining,
        },
        events,
        seed,
    ))
}

/// Replace the synthetic "Yearly" leftover row and return the unclamped
/// remaining annual budget.
fn apply_yearly_plan(
    category: &str,
    ledger: &mut DatedLedger,
    actual: &[MonthSum],
    ctx: &ParseContext<'_>,
) -> BudgetResult<f64> {
    ledger.rows.retain(|r| r.description != YEARLY_ROW);

    let plan = ctx
        .expenses
        .get(category)
        .ok_or_else(|| BudgetError::MissingExpensePlan {
            category: category.to_string(),
        })?;
    let year_end = end_of_year(ctx.year)
        .ok_or_else(|| BudgetError::Validation(format!("Invalid budget year {}", ctx.year)))?;

    let actual_sum: f64 = actual
        .iter()
        .filter(|(date, _)| date.year() == ctx.year)
        .map(|(_, amount)| amount)
        .sum();
    let forward_sum: f64 = ledger.forward().map(|r| r.amount).sum();
    let next_year_sum: f64 = ledger.rows.iter().map(|r| r.next_year).sum();

    let this_year_left = (plan.this_year - (actual_sum + forward_sum)).min(0.0);
    let next_year_left = (plan.next_year - next_year_sum).min(0.0);

    ledger
        .rows
        .push(LedgerRow::new(year_end, YEARLY_ROW, this_year_left).with_next_year(next_year_left));

    Ok(plan.this_year - actual_sum)
}

/// Actual / Reconciled / Difference / Planned per month.
///
/// Spans the earliest to the latest month of the actual and planned series.
/// A ledger with no planned rows is compared over the twelve months of `year`.
fn monthly_table(ledger: &DatedLedger, actual: &[MonthSum], year: i32) -> MonthlyTable {
    let mut planned = monthly_sums(None, ledger.rows.iter().map(PlannedAmount));
    let reconciled = monthly_sums(None, ledger.reconciled().map(PlannedAmount));
    if planned.is_empty() {
        planned = month_ends_of_year(year).into_iter().map(|d| (d, 0.0)).collect();
    }

    let firsts = actual.first().into_iter().chain(planned.first());
    let lasts = actual.last().into_iter().chain(planned.last());
    let (Some(first), Some(last)) = (
        firsts.map(|(d, _)| *d).min(),
        lasts.map(|(d, _)| *d).max(),
    ) else {
        return MonthlyTable::default();
    };

    let rows = month_ends_between(first, last)
        .into_iter()
        .map(|end_of_month| {
            let actual = month_value(actual, end_of_month);
            let reconciled = month_value(&reconciled, end_of_month);
            MonthlyRow {
                end_of_month,
                actual,
                reconciled,
                difference: actual - reconciled,
                planned: month_value(&planned, end_of_month),
            }
        })
        .collect();

    MonthlyTable { rows }
}

/// Year events of Loan and Default ledgers: monthly actual totals plus the
/// forward (not yet reconciled) rows, exact zeros dropped
fn dated_projection(
    category: &str,
    ledger: &DatedLedger,
    actual: &[MonthSum],
) -> Vec<ProjectionEvent> {
    let totals = actual
        .iter()
        .filter(|(_, amount)| *amount != 0.0)
        .map(|(date, amount)| {
            ProjectionEvent::new(
                *date,
                format!("{} total for {} {}", category, month_name(*date), date.year()),
                *amount,
                category,
            )
        });

    let forward = ledger
        .forward()
        .filter(|row| row.amount != 0.0)
        .map(|row| {
            ProjectionEvent::new(
                row.date,
                format!(
                    "{} in {} {}",
                    row.description,
                    month_name(row.date),
                    row.date.year()
                ),
                row.amount,
                category,
            )
            .with_note(row.note.clone())
        });

    totals.chain(forward).collect()
}

fn normalize_descriptions(ledger: &mut DatedLedger, category: &str) {
    for row in &mut ledger.rows {
        row.description = normalize_description(&row.description, category);
    }
}

/// Rewrite generated labels ("Payment #1234") to "<first word> <category>"
/// and drop repeated words, keeping the first occurrence.
pub fn normalize_description(description: &str, category: &str) -> String {
    let base = if description.contains('#') {
        let first = description.split_whitespace().next().unwrap_or_default();
        format!("{} {}", first, category)
    } else {
        description.to_string()
    };

    let mut words: Vec<&str> = Vec::new();
    for word in base.split_whitespace() {
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words.join(" ")
}
