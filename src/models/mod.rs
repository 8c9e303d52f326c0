//! Core data models for MoneyMage
//!
//! Workbook cells and sheets, category classification, typed category
//! ledgers, transactions, the expense plan, projection events and the
//! workbook that holds them.

pub mod category;
pub mod cell;
pub mod dates;
pub mod expense;
pub mod ledger;
pub mod projection;
pub mod sheet;
pub mod transaction;
pub mod workbook;

pub use category::{CategoryType, CategoryTypes, SummaryClass};
pub use cell::CellValue;
pub use expense::{ExpensePlan, PlannedExpense};
pub use ledger::{
    BudgetLedger, DatedLedger, LedgerRow, MonthlyRow, MonthlyStatus, MonthlyTable, ParsedLedger,
    PeriodPlan, QuarterlyStatus,
};
pub use projection::ProjectionEvent;
pub use sheet::{Column, Sheet};
pub use transaction::Transaction;
pub use workbook::Workbook;
