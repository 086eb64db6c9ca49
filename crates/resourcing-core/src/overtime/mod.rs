//! Overtime and delivery-health analysis.
//!
//! For every due-dated job, compares the hour offset where the job finishes
//! with the capacity its assignee has through the due date. Hours past that
//! cutoff are a deficit that has to come from overtime or from idle
//! teammates. The team's total deficit is then weighed against the free
//! hours of everyone who is not overloaded to classify delivery health.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::capacity::{CapacityDay, SegmentIndex};
use crate::occupancy::{allocate, free_hours_between};
use crate::scheduler::ScheduledJob;

/// Deficits at or below this many hours are treated as zero.
const DEFICIT_TOLERANCE: f64 = 1e-9;

/// Aggregate delivery risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// No due date is at risk
    Healthy,
    /// Deficits exist but idle capacity covers them by the earliest miss
    EarlyWarning,
    /// Idle capacity covers the deficit only by the latest miss
    Warning,
    /// Idle capacity does not cover the deficit even by the latest miss
    Critical,
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthState::Healthy => "Healthy",
            HealthState::EarlyWarning => "Early warning",
            HealthState::Warning => "Warning",
            HealthState::Critical => "Critical",
        };
        f.write_str(label)
    }
}

/// One due-dated job that finishes past its cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDeficit {
    pub assignee: String,
    pub job_id: String,
    pub job_name: String,
    pub due_date: NaiveDate,
    /// Capacity available through the due date
    pub cutoff_hours: f64,
    pub finish_hour: f64,
    pub deficit_hours: f64,
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeReport {
    /// Sum of per-assignee overtime
    pub overtime_needed: f64,
    /// Largest deficit per overloaded assignee
    pub per_assignee: BTreeMap<String, f64>,
    pub overloaded: BTreeSet<String>,
    pub violated_due_dates: BTreeSet<NaiveDate>,
    pub deficits: Vec<JobDeficit>,
    /// Idle free hours from `today` through the earliest violated due date
    pub offset_capacity_earliest: f64,
    /// Idle free hours from `today` through the latest violated due date
    pub offset_capacity_latest: f64,
    pub health: HealthState,
}

/// Deficits for one assignee's schedule.
pub fn job_deficits(
    assignee: &str,
    schedule: &[ScheduledJob],
    capacity_days: &[CapacityDay],
) -> Vec<JobDeficit> {
    let index = SegmentIndex::new(capacity_days);
    schedule
        .iter()
        .filter_map(|item| {
            let due_date = item.job.due_date?;
            let cutoff_hours = index.hours_through(due_date);
            let deficit_hours = (item.finish_hour - cutoff_hours).max(0.0);
            (deficit_hours > DEFICIT_TOLERANCE).then(|| JobDeficit {
                assignee: assignee.to_string(),
                job_id: item.job.id.clone(),
                job_name: item.job.name.clone(),
                due_date,
                cutoff_hours,
                finish_hour: item.finish_hour,
                deficit_hours,
            })
        })
        .collect()
}

/// Free hours from `today` through `cutoff` summed over `members`.
///
/// Members without a calendar contribute nothing; members without a
/// schedule contribute their whole capacity in the window.
pub fn offset_capacity<'a>(
    members: impl IntoIterator<Item = &'a String>,
    schedules: &BTreeMap<String, Vec<ScheduledJob>>,
    capacity_days: &BTreeMap<String, Vec<CapacityDay>>,
    today: NaiveDate,
    cutoff: NaiveDate,
) -> f64 {
    if cutoff < today {
        return 0.0;
    }
    members
        .into_iter()
        .filter_map(|member| {
            let days = capacity_days.get(member)?;
            let schedule = schedules.get(member).map(Vec::as_slice).unwrap_or(&[]);
            let occupancy = allocate(schedule, days, days.len());
            Some(free_hours_between(&occupancy, today, cutoff))
        })
        .sum()
}

/// Analyze overtime and classify health for the whole team.
///
/// `capacity_days` should hold every team member. Members that end up
/// without a deficit are the idle pool whose free hours can offset the
/// overloaded ones.
pub fn analyze(
    schedules: &BTreeMap<String, Vec<ScheduledJob>>,
    capacity_days: &BTreeMap<String, Vec<CapacityDay>>,
    today: NaiveDate,
) -> OvertimeReport {
    let mut deficits = Vec::new();
    let mut per_assignee = BTreeMap::new();

    for (assignee, schedule) in schedules {
        let days = capacity_days.get(assignee).map(Vec::as_slice).unwrap_or(&[]);
        let found = job_deficits(assignee, schedule, days);
        // later jobs already carry the backlog of earlier ones, so take the max
        let worst = found.iter().map(|d| d.deficit_hours).fold(0.0, f64::max);
        if worst > DEFICIT_TOLERANCE {
            per_assignee.insert(assignee.clone(), worst);
        }
        deficits.extend(found);
    }

    let overtime_needed: f64 = per_assignee.values().sum();
    let overloaded: BTreeSet<String> = per_assignee.keys().cloned().collect();
    let violated_due_dates: BTreeSet<NaiveDate> = deficits.iter().map(|d| d.due_date).collect();

    let idle: Vec<&String> = capacity_days
        .keys()
        .filter(|m| !overloaded.contains(*m))
        .collect();
    let offset_through = |cutoff: Option<&NaiveDate>| {
        cutoff.map_or(0.0, |c| {
            offset_capacity(idle.iter().copied(), schedules, capacity_days, today, *c)
        })
    };
    let offset_capacity_earliest = offset_through(violated_due_dates.first());
    let offset_capacity_latest = offset_through(violated_due_dates.last());

    let health = classify(
        overtime_needed,
        offset_capacity_earliest,
        offset_capacity_latest,
    );

    if health != HealthState::Healthy {
        tracing::info!(
            %health,
            overtime_needed,
            overloaded = overloaded.len(),
            offset_capacity_earliest,
            offset_capacity_latest,
            "due dates at risk"
        );
    }

    OvertimeReport {
        overtime_needed,
        per_assignee,
        overloaded,
        violated_due_dates,
        deficits,
        offset_capacity_earliest,
        offset_capacity_latest,
        health,
    }
}

/// First matching rule wins.
pub fn classify(overtime_needed: f64, offset_earliest: f64, offset_latest: f64) -> HealthState {
    if overtime_needed <= 0.0 {
        HealthState::Healthy
    } else if overtime_needed > offset_earliest && overtime_needed > offset_latest {
        HealthState::Critical
    } else if overtime_needed > offset_earliest {
        HealthState::Warning
    } else {
        HealthState::EarlyWarning
    }
}
