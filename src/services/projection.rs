//! Multi-year projection builder
//!
//! Merges every category's events into one chronological ledger and threads
//! a running balance through it.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::dates::{end_of_year, start_of_year};
use crate::models::{ProjectionEvent, Sheet};
use crate::services::sums::{monthly_sums, MonthSum};

/// Years after the budget year covered by the year-end balances
const BALANCE_YEARS: i32 = 5;

/// Sort events and fill in their running balances.
///
/// After the call, `events[k].balance == starting_balance + sum(amounts[0..=k])`.
pub fn build_projection(
    mut events: Vec<ProjectionEvent>,
    starting_balance: f64,
) -> Vec<ProjectionEvent> {
    events.sort_by(ProjectionEvent::chronological);
    let mut balance = starting_balance;
    for event in &mut events {
        balance += event.amount;
        event.balance = balance;
    }
    events
}

/// Per-category monthly sums of the events dated before January 1 of `year + 1`
pub fn category_monthly_sums(
    events: &[ProjectionEvent],
    year: i32,
) -> BTreeMap<String, Vec<MonthSum>> {
    let cutoff = start_of_year(year + 1);
    let mut by_category: BTreeMap<String, Vec<&ProjectionEvent>> = BTreeMap::new();
    for event in events
        .iter()
        .filter(|e| cutoff.map_or(true, |cutoff| e.date < cutoff))
    {
        by_category
            .entry(event.category.clone())
            .or_default()
            .push(event);
    }

    by_category
        .into_iter()
        .map(|(category, events)| (category, monthly_sums(None, events)))
        .collect()
}

/// The forecast-only projection of `year + 1`, threaded from a zero balance
pub fn ideal_projection(events: &[ProjectionEvent], year: i32) -> Vec<ProjectionEvent> {
    let ideal = events
        .iter()
        .filter(|e| e.date.year() == year + 1 && e.is_forecast())
        .cloned()
        .collect();
    build_projection(ideal, 0.0)
}

/// Starting balance: the last numeric value of the Balances sheet's
/// "Balance" column, or zero
pub fn starting_balance(balances: &Sheet) -> f64 {
    balances
        .column("Balance")
        .and_then(|c| c.cells.iter().rev().find_map(|cell| cell.as_number()))
        .unwrap_or(0.0)
}

/// Projected balance at the end of one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearEndBalance {
    pub year: i32,
    pub balance: f64,
}

/// Year-end balances of the master projection plus the ideal end balance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionBalances {
    pub year_end: Vec<YearEndBalance>,
    pub ideal_final: f64,
}

impl ProjectionBalances {
    /// Balance after the last event dated on or before December 31 of each of
    /// `year ..= year + 5`; the starting balance when no such event exists
    pub fn compute(
        projection: &[ProjectionEvent],
        ideal: &[ProjectionEvent],
        starting_balance: f64,
        year: i32,
    ) -> Self {
        let year_end = (year..=year + BALANCE_YEARS)
            .filter_map(|y| end_of_year(y).map(|end| (y, end)))
            .map(|(y, end)| YearEndBalance {
                year: y,
                balance: projection
                    .iter()
                    .take_while(|e| e.date <= end)
                    .last()
                    .map_or(starting_balance, |e| e.balance),
            })
            .collect();

        Self {
            year_end,
            ideal_final: ideal.last().map_or(0.0, |e| e.balance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, Column};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn events() -> Vec<ProjectionEvent> {
        vec![
            ProjectionEvent::new(d(2025, 3, 31), "Rent", -900.0, "Housing"),
            ProjectionEvent::new(d(2025, 1, 31), "Pay", 3000.0, "Paycheck"),
            ProjectionEvent::new(d(2026, 1, 31), "Forecast: Paycheck for January 2026", 3100.0, "Paycheck"),
            ProjectionEvent::new(d(2026, 2, 15), "Bonus in February 2026", 500.0, "Paycheck"),
            ProjectionEvent::new(d(2027, 1, 31), "Forecast: Paycheck for January 2027", 3200.0, "Paycheck"),
        ]
    }

    #[test]
    fn test_running_balance_fold() {
        let projection = build_projection(events(), 100.0);
        let dates: Vec<NaiveDate> = projection.iter().map(|e| e.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);

        let mut expected = 100.0;
        for event in &projection {
            expected += event.amount;
            assert_eq!(event.balance, expected);
        }
        assert_eq!(projection[0].balance, 3100.0);
        assert_eq!(projection[1].balance, 2200.0);
    }

    #[test]
    fn test_category_monthly_sums_stop_at_year_end() {
        let projection = build_projection(events(), 0.0);
        let sums = category_monthly_sums(&projection, 2025);
        assert_eq!(sums.len(), 2);
        assert_eq!(sums["Paycheck"], vec![(d(2025, 1, 31), 3000.0)]);
        assert_eq!(sums["Housing"], vec![(d(2025, 3, 31), -900.0)]);
    }

    #[test]
    fn test_ideal_projection_is_forecast_only_next_year() {
        let projection = build_projection(events(), 100.0);
        let ideal = ideal_projection(&projection, 2025);
        assert_eq!(ideal.len(), 1);
        assert_eq!(ideal[0].amount, 3100.0);
        assert_eq!(ideal[0].balance, 3100.0);
    }

    #[test]
    fn test_year_end_balances() {
        let projection = build_projection(events(), 100.0);
        let ideal = ideal_projection(&projection, 2025);
        let balances = ProjectionBalances::compute(&projection, &ideal, 100.0, 2025);

        assert_eq!(balances.year_end.len(), 6);
        assert_eq!(balances.year_end[0], YearEndBalance { year: 2025, balance: 2200.0 });
        assert_eq!(balances.year_end[1].balance, 5800.0);
        assert_eq!(balances.year_end[2].balance, 9000.0);
        assert_eq!(balances.year_end[5].balance, 9000.0);
        assert_eq!(balances.ideal_final, 3100.0);
    }

    #[test]
    fn test_year_end_balance_without_events_is_starting_balance() {
        let balances = ProjectionBalances::compute(&[], &[], 42.0, 2025);
        assert!(balances.year_end.iter().all(|b| b.balance == 42.0));
        assert_eq!(balances.ideal_final, 0.0);
    }

    #[test]
    fn test_starting_balance_takes_last_number() {
        let sheet = Sheet::new("Balances").with_column(Column::new(
            "Balance",
            vec![
                CellValue::Number(10.0),
                CellValue::Number(25.5),
                CellValue::text("pending"),
                CellValue::Empty,
            ],
        ));
        assert_eq!(starting_balance(&sheet), 25.5);
        assert_eq!(starting_balance(&Sheet::new("Balances")), 0.0);
    }
}
