//! Per-person calendar settings.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Set of working weekdays.
///
/// Serialized as a sorted list of indices, 0 = Monday .. 6 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WorkWeek(u8);

impl WorkWeek {
    pub const fn empty() -> Self {
        WorkWeek(0)
    }

    /// Monday to Friday.
    pub const fn weekdays() -> Self {
        WorkWeek(0b0001_1111)
    }

    pub fn from_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        days.into_iter()
            .fold(Self::empty(), |week, day| week.with(day))
    }

    pub fn with(self, day: Weekday) -> Self {
        WorkWeek(self.0 | (1 << day.num_days_from_monday()))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(|d| self.contains(*d))
    }

    /// Build from indices, skipping anything outside 0..=6.
    ///
    /// An empty result falls back to Monday to Friday.
    pub fn from_indices_lossy(indices: impl IntoIterator<Item = i64>) -> Self {
        let week = indices
            .into_iter()
            .filter_map(|i| usize::try_from(i).ok())
            .filter_map(|i| WEEK.get(i).copied())
            .fold(Self::empty(), |week, day| week.with(day));
        if week.is_empty() {
            Self::weekdays()
        } else {
            week
        }
    }
}

impl Default for WorkWeek {
    fn default() -> Self {
        Self::weekdays()
    }
}

impl TryFrom<Vec<u8>> for WorkWeek {
    type Error = ValidationError;

    fn try_from(indices: Vec<u8>) -> Result<Self, Self::Error> {
        indices.into_iter().try_fold(Self::empty(), |week, i| {
            WEEK.get(usize::from(i))
                .map(|day| week.with(*day))
                .ok_or(ValidationError::WeekdayOutOfRange(i))
        })
    }
}

impl From<WorkWeek> for Vec<u8> {
    fn from(week: WorkWeek) -> Self {
        week.days()
            .map(|d| d.num_days_from_monday() as u8)
            .collect()
    }
}

impl fmt::Display for WorkWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.days().map(|d| d.to_string()).collect();
        write!(f, "{}", labels.join(","))
    }
}

impl FromStr for WorkWeek {
    type Err = ValidationError;

    /// Parse a comma-separated list such as `Mon,Tue,Wed`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .try_fold(Self::empty(), |week, part| {
                part.parse::<Weekday>()
                    .map(|day| week.with(day))
                    .map_err(|_| ValidationError::InvalidValue {
                        field: "working_weekdays".into(),
                        message: format!("unknown weekday '{part}'"),
                    })
            })
    }
}

/// Calendar settings owned by one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub working_weekdays: WorkWeek,
    /// Fully blocked dates (leave, shutdown)
    #[serde(default)]
    pub non_working_dates: BTreeSet<NaiveDate>,
    /// Partial-day hours already consumed, by date
    #[serde(default)]
    pub unavailable_hours: BTreeMap<NaiveDate, f64>,
}

impl CalendarConfig {
    /// Monday to Friday, no leave, starting on `start_date`.
    pub fn starting(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            working_weekdays: WorkWeek::weekdays(),
            non_working_dates: BTreeSet::new(),
            unavailable_hours: BTreeMap::new(),
        }
    }

    pub fn with_weekdays(mut self, week: WorkWeek) -> Self {
        self.working_weekdays = week;
        self
    }

    pub fn with_leave(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.non_working_dates.extend(dates);
        self
    }

    /// Record consumed hours for a date, adding to anything already there.
    pub fn add_unavailable(&mut self, date: NaiveDate, hours: f64) {
        if !hours.is_finite() || hours <= 0.0 {
            return;
        }
        *self.unavailable_hours.entry(date).or_insert(0.0) += hours;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_week_serializes_as_indices() {
        let week = WorkWeek::from_days([Weekday::Mon, Weekday::Wed, Weekday::Sun]);
        let json = serde_json::to_string(&week).unwrap();
        assert_eq!(json, "[0,2,6]");
        let back: WorkWeek = serde_json::from_str(&json).unwrap();
        assert_eq!(back, week);
    }

    #[test]
    fn work_week_rejects_out_of_range_index() {
        let result: Result<WorkWeek, _> = serde_json::from_str("[0,7]");
        assert!(result.is_err());
    }

    #[test]
    fn work_week_parses_labels() {
        let week: WorkWeek = "Mon, tue,Friday".parse().unwrap();
        assert!(week.contains(Weekday::Mon));
        assert!(week.contains(Weekday::Tue));
        assert!(week.contains(Weekday::Fri));
        assert!(!week.contains(Weekday::Wed));
        assert!("Mon,Funday".parse::<WorkWeek>().is_err());
    }

    #[test]
    fn lossy_indices_fall_back_to_weekdays() {
        assert_eq!(WorkWeek::from_indices_lossy([9, -1]), WorkWeek::weekdays());
        assert_eq!(
            WorkWeek::from_indices_lossy([5, 6, 42]),
            WorkWeek::from_days([Weekday::Sat, Weekday::Sun])
        );
    }

    #[test]
    fn add_unavailable_sums_and_ignores_bad_values() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let mut cfg = CalendarConfig::starting(d);
        cfg.add_unavailable(d, 2.0);
        cfg.add_unavailable(d, 1.5);
        cfg.add_unavailable(d, -4.0);
        cfg.add_unavailable(d, f64::NAN);
        assert_eq!(cfg.unavailable_hours.get(&d), Some(&3.5));
    }

    #[test]
    fn leave_is_recorded_once() {
        let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let cfg = CalendarConfig::starting(monday).with_leave([monday, monday]);
        assert_eq!(cfg.non_working_dates.len(), 1);
        assert!(cfg.non_working_dates.contains(&monday));
    }
}
