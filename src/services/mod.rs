//! Service layer for MoneyMage
//!
//! Budget arithmetic on top of the models: monthly aggregation, category
//! parsing, forecasting, projection building and summaries. `update` ties
//! them together into one run.

pub mod forecast;
pub mod parser;
pub mod projection;
pub mod summary;
pub mod sums;
pub mod update;

pub use parser::{parse_budget, ParseContext, ParsedBudget};
pub use projection::{ProjectionBalances, YearEndBalance};
pub use summary::{OutOfBalance, QuarterSummary, RemainingExpenseTable, YearSummary};
pub use update::{BudgetReport, BudgetUpdater};
