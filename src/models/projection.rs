//! Projection events
//!
//! The master projection is a flat, chronologically sorted list of dated
//! cash-flow events across all categories with a running balance.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cell::CellValue;
use super::ledger::columns::{DATE, DESC, NOTE};
use super::sheet::{Column, Sheet};

/// Marker carried by every forecast description
pub const FORECAST_MARKER: &str = "Forecast:";

/// One dated cash-flow event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionEvent {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
    /// Running balance, filled in after the global sort
    pub balance: f64,
    #[serde(default)]
    pub note: String,
}

impl ProjectionEvent {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            category: category.into(),
            balance: 0.0,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn is_forecast(&self) -> bool {
        self.description.contains(FORECAST_MARKER)
    }

    /// Total order on (date, description, amount, category, balance, note)
    pub fn chronological(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.description.cmp(&other.description))
            .then_with(|| self.amount.total_cmp(&other.amount))
            .then_with(|| self.category.cmp(&other.category))
            .then_with(|| self.balance.total_cmp(&other.balance))
            .then_with(|| self.note.cmp(&other.note))
    }
}

/// Render events as a projection sheet
pub fn events_to_sheet(name: &str, events: &[ProjectionEvent], date_format: &str) -> Sheet {
    Sheet::new(name)
        .with_column(Column::new(
            DATE,
            events
                .iter()
                .map(|e| CellValue::date(e.date, date_format))
                .collect(),
        ))
        .with_column(Column::texts(DESC, events.iter().map(|e| e.description.clone())))
        .with_column(Column::numbers("Amount", events.iter().map(|e| e.amount)))
        .with_column(Column::texts("Category", events.iter().map(|e| e.category.clone())))
        .with_column(Column::numbers("Balance", events.iter().map(|e| e.balance)))
        .with_column(Column::texts(NOTE, events.iter().map(|e| e.note.clone())))
}
