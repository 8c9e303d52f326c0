//! Monthly and quarterly aggregation
//!
//! Buckets dated amounts into calendar-aligned month-end or quarter sums.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

use crate::models::dates::{end_of_month, month_ends_between, quarter_index};
use crate::models::{LedgerRow, ProjectionEvent, QuarterlyStatus, Transaction};

/// A (month-end date, summed amount) pair
pub type MonthSum = (NaiveDate, f64);

/// Anything with a date and an amount, optionally labelled with a category
pub trait Observation {
    fn date(&self) -> NaiveDate;
    fn amount(&self) -> f64;
    fn category(&self) -> Option<&str> {
        None
    }
}

impl Observation for Transaction {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn amount(&self) -> f64 {
        self.amount
    }
    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }
}

impl Observation for ProjectionEvent {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn amount(&self) -> f64 {
        self.amount
    }
    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }
}

impl Observation for (NaiveDate, f64) {
    fn date(&self) -> NaiveDate {
        self.0
    }
    fn amount(&self) -> f64 {
        self.1
    }
}

impl<T: Observation + ?Sized> Observation for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }
    fn amount(&self) -> f64 {
        (**self).amount()
    }
    fn category(&self) -> Option<&str> {
        (**self).category()
    }
}

/// Ledger rows observed through their "This Year"/"Payment" amount
pub struct PlannedAmount<'a>(pub &'a LedgerRow);

/// Ledger rows observed through their "Next Year" amount
pub struct NextYearAmount<'a>(pub &'a LedgerRow);

impl Observation for PlannedAmount<'_> {
    fn date(&self) -> NaiveDate {
        self.0.date
    }
    fn amount(&self) -> f64 {
        self.0.amount
    }
}

impl Observation for NextYearAmount<'_> {
    fn date(&self) -> NaiveDate {
        self.0.date
    }
    fn amount(&self) -> f64 {
        self.0.next_year
    }
}

/// Whether an observation counts towards `category`.
///
/// The filter only applies when both a category and a row label exist.
fn matches<O: Observation>(category: Option<&str>, observation: &O) -> bool {
    match (category, observation.category()) {
        (Some(wanted), Some(label)) => wanted == label,
        _ => true,
    }
}

/// Sum observations into contiguous month buckets.
///
/// The month sequence spans the earliest to the latest date of *all*
/// observations, including ones filtered out by `category`, so months with no
/// matching activity appear with a zero sum. No observations yield no buckets.
pub fn monthly_sums<I>(category: Option<&str>, observations: I) -> Vec<MonthSum>
where
    I: IntoIterator,
    I::Item: Observation,
{
    let observations: Vec<I::Item> = observations.into_iter().collect();
    let first = observations.iter().map(Observation::date).min();
    let last = observations.iter().map(Observation::date).max();
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };

    let mut buckets: Vec<MonthSum> = month_ends_between(first, last)
        .into_iter()
        .map(|date| (date, 0.0))
        .collect();

    for observation in observations.iter().filter(|o| matches(category, *o)) {
        let month_end = end_of_month(observation.date());
        if let Ok(i) = buckets.binary_search_by(|(date, _)| date.cmp(&month_end)) {
            buckets[i].1 += observation.amount();
        }
    }
    buckets
}

/// Where period `index` of `year` sits relative to the period containing `as_of`
pub fn period_position(year: i32, index: usize, as_of_year: i32, as_of_index: usize) -> Ordering {
    (year, index).cmp(&(as_of_year, as_of_index))
}

/// Spent and remaining budget per calendar quarter.
///
/// Spending is bucketed by month only, so observations from any year land in
/// their quarter. Remaining budget is zero for closed quarters, the full plan
/// for quarters not yet started, and `min(0, plan - spent)` for the quarter
/// containing `as_of`.
pub fn quarterly_sums<I>(
    category: Option<&str>,
    observations: I,
    plan: [f64; 4],
    year: i32,
    as_of: NaiveDate,
) -> QuarterlyStatus
where
    I: IntoIterator,
    I::Item: Observation,
{
    let mut spent = [0.0; 4];
    for observation in observations.into_iter().filter(|o| matches(category, o)) {
        spent[quarter_index(observation.date().month())] += observation.amount();
    }

    let current = quarter_index(as_of.month());
    let mut remaining = [0.0; 4];
    for q in 0..4 {
        remaining[q] = match period_position(year, q, as_of.year(), current) {
            Ordering::Less => 0.0,
            Ordering::Equal => (plan[q] - spent[q]).min(0.0),
            Ordering::Greater => plan[q],
        };
    }

    QuarterlyStatus { spent, remaining }
}

/// Amount of the bucket for the month containing `date`, or zero
pub fn month_value(sums: &[MonthSum], date: NaiveDate) -> f64 {
    let month_end = end_of_month(date);
    sums.iter()
        .find(|(d, _)| *d == month_end)
        .map(|(_, amount)| *amount)
        .unwrap_or(0.0)
}
