//! Budget update orchestration
//!
//! Runs the whole pipeline over one workbook: classifies categories, parses
//! every category ledger, merges the projections, and builds the summaries.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::models::dates::month_name;
use crate::models::expense::EXPENSES_SHEET;
use crate::models::transaction::categories_of;
use crate::models::workbook::{BALANCES_SHEET, CATEGORIES_SHEET};
use crate::models::{
    BudgetLedger, CategoryTypes, DatedLedger, ExpensePlan, ProjectionEvent, Transaction, Workbook,
};
use crate::reports::MonthlyOverview;
use crate::services::parser::{parse_budget, parse_ledger, ParseContext, ParsedBudget};
use crate::services::projection::{
    build_projection, category_monthly_sums, ideal_projection, starting_balance,
    ProjectionBalances,
};
use crate::services::summary::{
    out_of_balance, quarterly_summary, remaining_expenses, report_order, yearly_summary,
    OutOfBalance, QuarterSummary, RemainingExpenseTable, YearSummary,
};
use crate::services::sums::monthly_sums;

/// Everything one run derives from the workbook and transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetReport {
    pub year: i32,
    pub as_of: NaiveDate,
    pub types: CategoryTypes,
    pub expenses: ExpensePlan,
    /// Parsed categories in report order
    #[serde(skip)]
    pub budgets: Vec<ParsedBudget>,
    /// Transaction categories without a ledger sheet
    pub missing_budgets: Vec<String>,
    /// Categories with nothing planned and nothing spent
    pub empty_budgets: Vec<String>,
    pub out_of_balance: Vec<OutOfBalance>,
    pub starting_balance: f64,
    pub projection: Vec<ProjectionEvent>,
    pub ideal_projection: Vec<ProjectionEvent>,
    pub monthly: MonthlyOverview,
    pub ideal_monthly: MonthlyOverview,
    pub quarterly_summary: Vec<QuarterSummary>,
    pub yearly_summary: Vec<YearSummary>,
    pub remaining_expenses: RemainingExpenseTable,
    pub balances: ProjectionBalances,
}

impl BudgetReport {
    /// Parsed categories that are written back to the workbook
    pub fn non_empty_budgets(&self) -> impl Iterator<Item = &ParsedBudget> {
        self.budgets
            .iter()
            .filter(|b| !self.empty_budgets.contains(&b.category))
    }
}

/// Service running the budget pipeline
pub struct BudgetUpdater<'a> {
    settings: &'a Settings,
}

impl<'a> BudgetUpdater<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Run the pipeline.
    ///
    /// `transactions` is `None` when no transaction source exists, which is
    /// not the same as an empty source: without one, no category can be
    /// reported as a missing budget.
    pub fn run(
        &self,
        workbook: &Workbook,
        transactions: Option<&[Transaction]>,
        year: i32,
        as_of: NaiveDate,
    ) -> BudgetResult<BudgetReport> {
        info!(year, %as_of, sheets = workbook.sheets.len(), "Updating budget");

        let types = workbook
            .sheet(CATEGORIES_SHEET)
            .map(CategoryTypes::from_sheet)
            .unwrap_or_else(|| {
                warn!("No {} sheet; every category is parsed as Default", CATEGORIES_SHEET);
                CategoryTypes::default()
            });
        types.validate()?;

        let expenses = workbook
            .sheet(EXPENSES_SHEET)
            .map(ExpensePlan::from_sheet)
            .unwrap_or_default();
        let txns = transactions.unwrap_or(&[]);

        let sheet_categories: Vec<&str> = workbook
            .sheet_names()
            .filter(|name| !self.settings.is_excluded(name))
            .collect();
        let transaction_categories = categories_of(txns);
        let missing: BTreeSet<String> = transaction_categories
            .iter()
            .filter(|c| !self.settings.is_excluded(c) && !sheet_categories.contains(&c.as_str()))
            .cloned()
            .collect();

        let order = report_order(
            sheet_categories
                .iter()
                .copied()
                .chain(missing.iter().map(String::as_str)),
            &types,
            &self.settings.priority_categories,
        );

        let ctx = ParseContext {
            types: &types,
            expenses: &expenses,
            transactions: txns,
            year,
            as_of,
            date_format: &self.settings.date_format,
        };

        let mut budgets = Vec::with_capacity(order.len());
        let mut events = Vec::new();
        for category in &order {
            let parsed = match workbook.sheet(category) {
                Some(sheet) if !missing.contains(category) => {
                    let parsed = parse_budget(category, sheet, &ctx)?;
                    events.extend(parsed.year_projection.iter().cloned());
                    events.extend(parsed.forecast.iter().cloned());
                    parsed
                }
                _ => {
                    warn!(category = %category, "Missing budget");
                    events.extend(missing_budget_events(category, txns));
                    parse_ledger(
                        category,
                        BudgetLedger::Default(DatedLedger::default()),
                        false,
                        &ctx,
                    )?
                }
            };
            budgets.push(parsed);
        }

        let empty_budgets: Vec<String> = budgets
            .iter()
            .filter(|b| b.is_empty())
            .map(|b| b.category.clone())
            .collect();
        for category in &empty_budgets {
            warn!(category = %category, "Empty budget");
        }

        let out_of_balance = out_of_balance(&budgets, self.settings.out_of_balance_tolerance);
        for entry in &out_of_balance {
            warn!(category = %entry.category, difference = entry.difference, "Out of balance");
        }

        let starting_balance = workbook
            .sheet(BALANCES_SHEET)
            .map(starting_balance)
            .unwrap_or_else(|| {
                warn!("No {} sheet; projecting from a zero balance", BALANCES_SHEET);
                0.0
            });

        debug!(events = events.len(), "Building projection");
        let projection = build_projection(events, starting_balance);
        let ideal = ideal_projection(&projection, year);

        let monthly =
            MonthlyOverview::generate(year, &category_monthly_sums(&projection, year), &order);
        let ideal_monthly =
            MonthlyOverview::generate(year + 1, &category_monthly_sums(&ideal, year + 1), &order);

        let balances = ProjectionBalances::compute(&projection, &ideal, starting_balance, year);
        info!(
            categories = budgets.len(),
            missing = missing.len(),
            empty = empty_budgets.len(),
            "Budget update complete"
        );

        Ok(BudgetReport {
            year,
            as_of,
            quarterly_summary: quarterly_summary(&budgets),
            yearly_summary: yearly_summary(&budgets, &types),
            remaining_expenses: remaining_expenses(&budgets, year),
            types,
            expenses,
            budgets,
            missing_budgets: missing.into_iter().collect(),
            empty_budgets,
            out_of_balance,
            starting_balance,
            projection,
            ideal_projection: ideal,
            monthly,
            ideal_monthly,
            balances,
        })
    }
}

/// Monthly transaction totals of a category that has no ledger
fn missing_budget_events(category: &str, transactions: &[Transaction]) -> Vec<ProjectionEvent> {
    monthly_sums(Some(category), transactions)
        .into_iter()
        .filter(|(_, amount)| *amount != 0.0)
        .map(|(date, amount)| {
            ProjectionEvent::new(
                date,
                format!("{} transactions for {} {}", category, month_name(date), date.year()),
                amount,
                category,
            )
        })
        .collect()
}
