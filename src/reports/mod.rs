//! Reports module for MoneyMage
//!
//! Tabular views over a budget run.

pub mod monthly;

pub use monthly::{MonthlyOverview, OverviewRow};
