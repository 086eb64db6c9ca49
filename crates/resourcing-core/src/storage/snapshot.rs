//! Whole-state JSON export and import.
//!
//! Export writes the typed [`StateSnapshot`] as is. Import is lenient: it
//! reads loosely typed JSON, drops rows that cannot be used and fills in
//! defaults, so a hand-edited or older file still loads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::model::{clean_jobs, clean_team, CalendarConfig, Job, Person, WorkWeek};

/// Team, jobs and calendars in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub team: Vec<Person>,
    pub jobs: Vec<Job>,
    pub calendars: BTreeMap<String, CalendarConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    team: Vec<Value>,
    #[serde(default)]
    jobs: Vec<Value>,
    #[serde(default)]
    calendars: BTreeMap<String, RawCalendar>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCalendar {
    #[serde(default)]
    start_date: Option<Value>,
    #[serde(default)]
    working_weekdays: Vec<Value>,
    #[serde(default)]
    non_working_dates: Vec<Value>,
    #[serde(default)]
    unavailable_hours: BTreeMap<String, Value>,
}

fn as_date(value: &Value) -> Option<NaiveDate> {
    value.as_str()?.trim().parse().ok()
}

impl RawCalendar {
    fn sanitize(self, today: NaiveDate) -> CalendarConfig {
        let weekdays = WorkWeek::from_indices_lossy(
            self.working_weekdays
                .iter()
                .filter_map(|w| w.as_i64().or_else(|| w.as_str()?.trim().parse().ok())),
        );
        let non_working_dates: BTreeSet<NaiveDate> =
            self.non_working_dates.iter().filter_map(as_date).collect();

        let mut calendar = CalendarConfig::starting(
            self.start_date.as_ref().and_then(as_date).unwrap_or(today),
        )
        .with_weekdays(weekdays)
        .with_leave(non_working_dates);
        for (date, hours) in &self.unavailable_hours {
            if let (Ok(date), Some(hours)) = (date.trim().parse(), hours.as_f64()) {
                calendar.add_unavailable(date, hours);
            }
        }
        calendar
    }
}

impl StateSnapshot {
    /// Parse and sanitize a snapshot document.
    ///
    /// - team rows that do not parse or validate are dropped; an empty
    ///   team becomes the default team
    /// - jobs are cleaned the same way
    /// - weekday values outside 0..=6 are ignored, an empty list means Mon-Fri
    /// - unparseable dates are ignored; a missing start date is `today`
    /// - members without a calendar get the default one, and calendars of
    ///   unknown members are dropped
    ///
    /// # Errors
    /// Returns an error only when `json` is not a JSON object of the
    /// expected overall shape.
    pub fn from_json(json: &str, today: NaiveDate) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)?;

        let team = clean_team(
            raw.team
                .into_iter()
                .filter_map(|row| serde_json::from_value::<Person>(row).ok()),
        );
        let jobs = clean_jobs(
            raw.jobs
                .into_iter()
                .filter_map(|row| serde_json::from_value::<Job>(row).ok()),
        );

        let mut incoming = raw.calendars;
        let calendars = team
            .iter()
            .map(|person| {
                let calendar = incoming
                    .remove(&person.name)
                    .map(|raw| raw.sanitize(today))
                    .unwrap_or_else(|| CalendarConfig::starting(today));
                (person.name.clone(), calendar)
            })
            .collect();
        if !incoming.is_empty() {
            tracing::warn!(
                dropped = incoming.len(),
                "ignoring calendars of members not on the team"
            );
        }

        Ok(Self {
            team,
            jobs,
            calendars,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
