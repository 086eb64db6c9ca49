//! Interval scheduler.
//!
//! Places one assignee's ranked jobs back to back on a capacity-weighted
//! hour axis, then maps each job's start and finish offsets to calendar
//! dates through the capacity segment index:
//! - jobs run in (priority, name) order, without preemption
//! - job `i` starts where job `i - 1` finished
//! - offsets past the end of the calendar clamp to its last day

mod availability;

pub use availability::{backlog_queue, next_available_date};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::capacity::{total_capacity, CapacityDay, SegmentIndex};
use crate::error::ScheduleError;
use crate::model::Job;

/// Backs a finish offset off a capacity boundary so that a job ending
/// exactly at the end of a day is reported on that day.
pub const FINISH_EPSILON: f64 = 1e-9;

/// Finish date relative to the job's due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    /// Finishes before the due date
    Ahead,
    /// Finishes on the due date
    OnTime,
    /// Finishes after the due date
    Late,
}

/// A job placed on the assignee's hour axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    #[serde(flatten)]
    pub job: Job,
    /// Cumulative hour offset where the job starts (inclusive)
    pub start_hour: f64,
    /// Cumulative hour offset where the job ends (exclusive)
    pub finish_hour: f64,
    pub start_date: NaiveDate,
    pub finish_date: NaiveDate,
}

impl ScheduledJob {
    pub fn due_status(&self) -> Option<DueStatus> {
        let due = self.job.due_date?;
        Some(match self.finish_date.cmp(&due) {
            Ordering::Less => DueStatus::Ahead,
            Ordering::Equal => DueStatus::OnTime,
            Ordering::Greater => DueStatus::Late,
        })
    }
}

/// Schedule one assignee's active jobs against their capacity calendar.
///
/// An empty job list always yields an empty schedule.
///
/// # Errors
/// - [`ScheduleError::InvalidInput`] if any job has negative or non-finite
///   required hours
/// - [`ScheduleError::NoCapacity`] if `capacity_days` is empty
/// - [`ScheduleError::ZeroTotalCapacity`] if the days sum to zero hours
pub fn schedule(
    active_jobs: &[Job],
    capacity_days: &[CapacityDay],
) -> Result<Vec<ScheduledJob>, ScheduleError> {
    let Some(first) = active_jobs.first() else {
        return Ok(Vec::new());
    };
    let assignee = first.assignee.clone();

    if let Some(bad) = active_jobs
        .iter()
        .find(|j| !j.required_hours.is_finite() || j.required_hours < 0.0)
    {
        return Err(ScheduleError::invalid(
            "required_hours",
            format!("job '{}' has {} hours", bad.name, bad.required_hours),
        ));
    }
    if capacity_days.is_empty() {
        return Err(ScheduleError::NoCapacity { assignee });
    }
    if total_capacity(capacity_days) <= 0.0 {
        return Err(ScheduleError::ZeroTotalCapacity { assignee });
    }
    let index = SegmentIndex::new(capacity_days);

    let mut ordered: Vec<&Job> = active_jobs.iter().collect();
    ordered.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut running = 0.0;
    let mut out = Vec::with_capacity(ordered.len());
    for job in ordered {
        let start_hour = running;
        running += job.required_hours;
        let finish_hour = running;

        // index is non-empty, so date_at always resolves
        let (Some(start_date), Some(finish_date)) = (
            index.date_at(start_hour),
            index.date_at((finish_hour - FINISH_EPSILON).max(0.0)),
        ) else {
            return Err(ScheduleError::NoCapacity { assignee });
        };

        out.push(ScheduledJob {
            job: job.clone(),
            start_hour,
            finish_hour,
            start_date,
            finish_date,
        });
    }

    tracing::debug!(
        %assignee,
        jobs = out.len(),
        scheduled_hours = running,
        capacity_hours = index.total_hours(),
        "scheduled assignee"
    );
    Ok(out)
}
