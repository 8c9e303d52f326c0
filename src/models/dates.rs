//! Calendar arithmetic used by the budget engine
//!
//! All bucketing is done on month-end dates: a month is identified by its
//! last day, quarters by the last day of their final month.

use chrono::{Datelike, Months, NaiveDate};

/// Months of each calendar quarter
pub const QUARTER_MONTHS: [[u32; 3]; 4] = [[1, 2, 3], [4, 5, 6], [7, 8, 9], [10, 11, 12]];

/// Last day of the month containing `date`
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Contiguous month-end dates from the month of `first` through the month of
/// `last`, inclusive. Empty when `last` is in an earlier month than `first`.
pub fn month_ends_between(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let last = end_of_month(last);
    let mut current = end_of_month(first);
    while current <= last {
        out.push(current);
        match current.succ_opt() {
            Some(next) => current = end_of_month(next),
            None => break,
        }
    }
    out
}

/// The twelve month-end dates of a year
pub fn month_ends_of_year(year: i32) -> Vec<NaiveDate> {
    (1..=12)
        .filter_map(|m| NaiveDate::from_ymd_opt(year, m, 1))
        .map(end_of_month)
        .collect()
}

/// The four quarter-end dates of a year (Mar 31, Jun 30, Sep 30, Dec 31)
pub fn quarter_ends_of_year(year: i32) -> Vec<NaiveDate> {
    [3, 6, 9, 12]
        .iter()
        .filter_map(|m| NaiveDate::from_ymd_opt(year, *m, 1))
        .map(end_of_month)
        .collect()
}

/// Zero-based quarter index of a month (1..=12)
pub fn quarter_index(month: u32) -> usize {
    QUARTER_MONTHS
        .iter()
        .position(|months| months.contains(&month))
        .unwrap_or(3)
}

/// Shift a date by whole years keeping month and day; Feb 29 lands on Feb 28
/// in non-leap years.
pub fn add_years(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_add_months(Months::new(12 * years))
        .unwrap_or(date)
}

/// Full English month name ("January")
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

/// December 31 of a year
pub fn end_of_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}

/// January 1 of a year
pub fn start_of_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}
