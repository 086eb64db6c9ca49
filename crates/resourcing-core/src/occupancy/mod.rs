//! Occupancy projection.
//!
//! Spreads scheduled hour intervals over the capacity days they touch,
//! giving allocated and free hours per date plus per-date job labels.
//! Work is proportional to the segments each job actually spans, not to
//! the length of the calendar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::capacity::{CapacityDay, SegmentIndex};
use crate::scheduler::ScheduledJob;

/// Hours below this count as zero when classifying a day.
const STATUS_TOLERANCE: f64 = 0.001;

/// How full a capacity day is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Nothing allocated
    Free,
    /// Some work, some slack
    Partial,
    /// No free hours left
    Full,
}

/// Allocation for one capacity day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayOccupancy {
    pub date: NaiveDate,
    pub available_hours: f64,
    pub allocated_hours: f64,
    pub free_hours: f64,
}

impl DayOccupancy {
    pub fn status(&self) -> DayStatus {
        if self.allocated_hours <= STATUS_TOLERANCE {
            DayStatus::Free
        } else if self.free_hours <= STATUS_TOLERANCE {
            DayStatus::Full
        } else {
            DayStatus::Partial
        }
    }
}

/// The first `horizon` capacity days (at least one, when any exist).
fn window(capacity_days: &[CapacityDay], horizon: usize) -> &[CapacityDay] {
    let end = horizon.max(1).min(capacity_days.len());
    &capacity_days[..end]
}

/// Visit every (segment, job, overlap) triple with a positive overlap.
///
/// Job intervals are clipped to `[0, total capacity)` of the index first.
fn spread<'a, F>(schedule: &'a [ScheduledJob], index: &SegmentIndex, mut visit: F)
where
    F: FnMut(usize, &'a ScheduledJob, f64),
{
    let total = index.total_hours();
    for item in schedule {
        let start = item.start_hour.max(0.0);
        let finish = item.finish_hour.min(total);
        if finish <= start {
            continue;
        }
        let Some(first) = index.locate(start) else {
            continue;
        };
        for (i, segment) in index.segments().iter().enumerate().skip(first) {
            if segment.start_hour >= finish {
                break;
            }
            let overlap = segment.overlap(start, finish);
            if overlap > 0.0 {
                visit(i, item, overlap);
            }
        }
    }
}

/// Allocated and free hours for the first `horizon` capacity days.
///
/// Free hours never go negative. An empty schedule leaves every day fully
/// free.
pub fn allocate(
    schedule: &[ScheduledJob],
    capacity_days: &[CapacityDay],
    horizon: usize,
) -> Vec<DayOccupancy> {
    let days = window(capacity_days, horizon);
    let index = SegmentIndex::new(days);

    let mut allocated = vec![0.0; index.len()];
    spread(schedule, &index, |i, _, overlap| allocated[i] += overlap);

    index
        .segments()
        .iter()
        .zip(allocated)
        .map(|(segment, allocated_hours)| DayOccupancy {
            date: segment.date,
            available_hours: segment.available_hours,
            allocated_hours,
            free_hours: (segment.available_hours - allocated_hours).max(0.0),
        })
        .collect()
}

/// `"job (hours)"` labels for each of the first `horizon` capacity days.
///
/// Every day in the window has an entry, empty when nothing is booked.
pub fn day_job_details(
    schedule: &[ScheduledJob],
    capacity_days: &[CapacityDay],
    horizon: usize,
) -> BTreeMap<NaiveDate, Vec<String>> {
    let days = window(capacity_days, horizon);
    let index = SegmentIndex::new(days);

    let mut labels: Vec<Vec<String>> = vec![Vec::new(); index.len()];
    spread(schedule, &index, |i, item, overlap| {
        labels[i].push(format!("{} ({:.1}h)", item.job.display_name(), overlap));
    });

    index
        .segments()
        .iter()
        .map(|s| s.date)
        .zip(labels)
        .collect()
}

/// Free hours on days `from..=through` of an occupancy projection.
pub fn free_hours_between(occupancy: &[DayOccupancy], from: NaiveDate, through: NaiveDate) -> f64 {
    occupancy
        .iter()
        .filter(|d| d.date >= from && d.date <= through)
        .map(|d| d.free_hours)
        .sum()
}
