//! Next-available dates and the on-hold backlog queue.

use chrono::NaiveDate;
use std::cmp::Ordering;

use super::ScheduledJob;
use crate::capacity::CapacityDay;
use crate::model::Job;

/// First date the assignee is free again after `schedule`.
///
/// That is the first capacity day strictly after the latest finish date,
/// or the day after the latest finish when the calendar runs out. An empty
/// schedule means the assignee is free from `start_date`.
pub fn next_available_date(
    schedule: &[ScheduledJob],
    capacity_days: &[CapacityDay],
    start_date: NaiveDate,
) -> NaiveDate {
    let Some(last_finish) = schedule.iter().map(|s| s.finish_date).max() else {
        return start_date;
    };
    capacity_days
        .iter()
        .map(|d| d.date)
        .find(|d| *d > last_finish)
        .or_else(|| last_finish.succ_opt())
        .unwrap_or(last_finish)
}

/// Queue the on-hold jobs behind the active ones.
///
/// Hold jobs are ordered by due date (undated last) then name, and ranked
/// after the highest active priority. With no active work they rank 1..N.
pub fn backlog_queue(active: &[Job], hold: &[Job]) -> Vec<Job> {
    let mut parked: Vec<Job> = hold.to_vec();
    parked.sort_by(|a, b| {
        due_order(a.due_date, b.due_date).then_with(|| a.name.cmp(&b.name))
    });

    let base = active.iter().map(|j| j.priority).max().unwrap_or(0);
    for (offset, job) in parked.iter_mut().enumerate() {
        job.priority = base + offset as u32 + 1;
    }

    let mut queue = active.to_vec();
    queue.extend(parked);
    queue
}

fn due_order(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
