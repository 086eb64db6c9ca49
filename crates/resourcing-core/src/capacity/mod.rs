//! Capacity calendars.
//!
//! Turns a person's calendar settings into the ordered list of dates on
//! which they can actually work, with the hours left on each date after
//! leave and partial-day unavailability are taken out.

mod segment;

pub use segment::{CapacitySegment, SegmentIndex};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ScheduleError;
use crate::model::{CalendarConfig, WorkWeek, MIN_DAILY_HOURS};

/// Calendar walk bound used when nothing else is configured (about ten years).
pub const DEFAULT_HORIZON_DAYS: u32 = 3650;

/// A date with strictly positive working hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityDay {
    pub date: NaiveDate,
    pub available_hours: f64,
}

/// Walk `horizon_days` calendar dates from `start_date` and keep the ones
/// with capacity left.
///
/// A date is kept when its weekday is in `weekdays`, it is not in
/// `non_working_dates`, and `daily_hours` minus its unavailable hours is
/// above zero. Fully consumed days are skipped rather than emitted empty.
///
/// # Errors
/// Returns [`ScheduleError::InvalidInput`] when `daily_hours` is not finite
/// or below one hour.
pub fn build_capacity_days(
    start_date: NaiveDate,
    weekdays: WorkWeek,
    non_working_dates: &BTreeSet<NaiveDate>,
    daily_hours: f64,
    unavailable_hours: &BTreeMap<NaiveDate, f64>,
    horizon_days: u32,
) -> Result<Vec<CapacityDay>, ScheduleError> {
    if !daily_hours.is_finite() || daily_hours < MIN_DAILY_HOURS {
        return Err(ScheduleError::invalid(
            "daily_hours",
            format!("expected a finite value >= {MIN_DAILY_HOURS}, got {daily_hours}"),
        ));
    }

    let mut days = Vec::new();
    let mut date = start_date;
    for _ in 0..horizon_days {
        if weekdays.contains(date.weekday()) && !non_working_dates.contains(&date) {
            // NaN and negative entries count as nothing consumed
            let consumed = unavailable_hours
                .get(&date)
                .map_or(0.0, |h| h.max(0.0))
                .min(daily_hours);
            let available_hours = daily_hours - consumed;
            if available_hours > 0.0 {
                days.push(CapacityDay {
                    date,
                    available_hours,
                });
            }
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    tracing::debug!(
        %start_date,
        horizon_days,
        capacity_days = days.len(),
        "built capacity calendar"
    );
    Ok(days)
}

impl CalendarConfig {
    /// Capacity days for this calendar at `daily_hours` per full day.
    ///
    /// # Errors
    /// See [`build_capacity_days`].
    pub fn capacity_days(
        &self,
        daily_hours: f64,
        horizon_days: u32,
    ) -> Result<Vec<CapacityDay>, ScheduleError> {
        build_capacity_days(
            self.start_date,
            self.working_weekdays,
            &self.non_working_dates,
            daily_hours,
            &self.unavailable_hours,
            horizon_days,
        )
    }
}

/// Merge unavailability maps from several sources.
///
/// Hours for the same date are summed and capped at `daily_hours`; entries
/// that are not positive finite numbers are ignored.
pub fn merge_unavailable_hours<'a>(
    sources: impl IntoIterator<Item = &'a BTreeMap<NaiveDate, f64>>,
    daily_hours: f64,
) -> BTreeMap<NaiveDate, f64> {
    let mut merged: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for source in sources {
        for (date, hours) in source {
            if hours.is_finite() && *hours > 0.0 {
                *merged.entry(*date).or_insert(0.0) += hours;
            }
        }
    }
    for hours in merged.values_mut() {
        *hours = hours.min(daily_hours);
    }
    merged
}

/// Sum of available hours over a slice of capacity days.
pub fn total_capacity(days: &[CapacityDay]) -> f64 {
    days.iter().map(|d| d.available_hours).sum()
}
