//! Five-year forecasts
//!
//! A category's seed series (its "Next Year" amounts, dated in the budget
//! year) is replicated one to five years ahead.

use chrono::Datelike;

use crate::models::dates::{add_years, month_name};
use crate::models::projection::FORECAST_MARKER;
use crate::models::ProjectionEvent;
use crate::services::sums::MonthSum;

/// How many years ahead forecasts reach
pub const FORECAST_YEARS: u32 = 5;

/// Forecast events for `category` from its seed series.
///
/// Each non-zero seed amount yields one event per year offset, dated on the
/// same month and day; zero amounts yield nothing.
pub fn forecast(category: &str, seed: &[MonthSum]) -> Vec<ProjectionEvent> {
    let mut events = Vec::new();
    for offset in 1..=FORECAST_YEARS {
        for (date, amount) in seed.iter().filter(|(_, amount)| *amount != 0.0) {
            let shifted = add_years(*date, offset);
            events.push(ProjectionEvent::new(
                shifted,
                format!(
                    "{} {} for {} {}",
                    FORECAST_MARKER,
                    category,
                    month_name(shifted),
                    shifted.year()
                ),
                *amount,
                category,
            ));
        }
    }
    events
}
