//! Team planner.
//!
//! Runs the engine for a whole team snapshot: cleans and normalizes the
//! job list, builds each member's capacity calendar, schedules active work
//! (and active work plus the on-hold backlog), then analyzes overtime
//! across everyone. A member whose calendar cannot hold their work is
//! reported in `failures` and does not stop the rest of the team.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::capacity::{CapacityDay, DEFAULT_HORIZON_DAYS};
use crate::error::ScheduleError;
use crate::model::{clean_jobs, CalendarConfig, Job, Person};
use crate::occupancy::{allocate, day_job_details, DayOccupancy, DayStatus};
use crate::overtime::{analyze, OvertimeReport};
use crate::priority::normalize;
use crate::scheduler::{backlog_queue, next_available_date, schedule, DueStatus, ScheduledJob};

/// Default number of capacity days in occupancy views.
pub const DEFAULT_CALENDAR_DAYS: usize = 20;

/// Planner settings.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Calendar walk bound in days
    pub horizon_days: u32,
    /// Reference date for offset capacity and default calendars
    pub today: NaiveDate,
}

impl PlanOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            today,
        }
    }
}

/// Snapshot of everything the engine reads.
#[derive(Debug, Clone, Default)]
pub struct TeamInput {
    pub team: Vec<Person>,
    pub jobs: Vec<Job>,
    pub calendars: BTreeMap<String, CalendarConfig>,
}

/// Which jobs an occupancy view counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyMode {
    ActiveOnly,
    WithBacklog,
}

/// One row of a member's job table.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRow {
    #[serde(flatten)]
    pub item: ScheduledJob,
    pub due_status: Option<DueStatus>,
}

/// Everything computed for one member.
#[derive(Debug, Clone, Serialize)]
pub struct MemberPlan {
    pub member: String,
    pub daily_hours: f64,
    pub calendar: CalendarConfig,
    pub schedule: Vec<ScheduleRow>,
    pub on_hold: Vec<Job>,
    pub next_available_active: NaiveDate,
    pub next_available_with_backlog: NaiveDate,
    #[serde(skip)]
    pub capacity_days: Vec<CapacityDay>,
    #[serde(skip)]
    pub backlog_schedule: Vec<ScheduledJob>,
}

/// A capacity day as shown in a member calendar.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    #[serde(flatten)]
    pub occupancy: DayOccupancy,
    pub status: DayStatus,
    pub jobs: Vec<String>,
}

impl MemberPlan {
    pub fn active_schedule(&self) -> Vec<ScheduledJob> {
        self.schedule.iter().map(|r| r.item.clone()).collect()
    }

    fn jobs_for(&self, mode: OccupancyMode) -> Vec<ScheduledJob> {
        match mode {
            OccupancyMode::ActiveOnly => self.active_schedule(),
            OccupancyMode::WithBacklog => self.backlog_schedule.clone(),
        }
    }

    /// Allocated and free hours for the first `days` capacity days.
    pub fn occupancy(&self, mode: OccupancyMode, days: usize) -> Vec<DayOccupancy> {
        allocate(&self.jobs_for(mode), &self.capacity_days, days)
    }

    /// Occupancy plus job labels for the first `days` capacity days.
    pub fn calendar_view(&self, mode: OccupancyMode, days: usize) -> Vec<CalendarDay> {
        let jobs = self.jobs_for(mode);
        let mut labels = day_job_details(&jobs, &self.capacity_days, days);
        allocate(&jobs, &self.capacity_days, days)
            .into_iter()
            .map(|occupancy| CalendarDay {
                status: occupancy.status(),
                jobs: labels.remove(&occupancy.date).unwrap_or_default(),
                occupancy,
            })
            .collect()
    }
}

/// Headline numbers for the team dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamSummary {
    /// Latest finish across active work
    pub forecast_finish: Option<NaiveDate>,
    /// Sum of active job durations
    pub active_hours: f64,
    /// Active and on-hold jobs
    pub total_jobs: usize,
    /// Members with active work
    pub active_members: usize,
}

/// Result of planning a team snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct TeamPlan {
    /// Normalized job snapshot, ready to be written back
    #[serde(skip)]
    pub jobs: Vec<Job>,
    pub members: Vec<MemberPlan>,
    pub failures: BTreeMap<String, ScheduleError>,
    /// Jobs whose assignee is not on the team
    pub unassigned: Vec<Job>,
    pub summary: TeamSummary,
    pub overtime: OvertimeReport,
}

impl TeamPlan {
    pub fn member(&self, name: &str) -> Option<&MemberPlan> {
        self.members.iter().find(|m| m.member == name)
    }
}

/// Runs the engine over a team snapshot.
pub struct TeamPlanner {
    options: PlanOptions,
}

impl TeamPlanner {
    pub fn new(options: PlanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    /// Plan every team member. Pure: the input is not modified.
    pub fn plan(&self, input: &TeamInput) -> TeamPlan {
        let jobs = normalize(clean_jobs(input.jobs.iter().cloned()));

        let mut members = Vec::new();
        let mut failures = BTreeMap::new();
        for person in &input.team {
            let calendar = input
                .calendars
                .get(&person.name)
                .cloned()
                .unwrap_or_else(|| CalendarConfig::starting(self.options.today));
            let own: Vec<&Job> = jobs.iter().filter(|j| j.assignee == person.name).collect();
            match self.plan_member(person, calendar, &own) {
                Ok(plan) => members.push(plan),
                Err(e) => {
                    tracing::warn!(member = %person.name, "cannot schedule member: {e}");
                    failures.insert(person.name.clone(), e);
                }
            }
        }

        let unassigned: Vec<Job> = jobs
            .iter()
            .filter(|j| !input.team.iter().any(|p| p.name == j.assignee))
            .cloned()
            .collect();
        if !unassigned.is_empty() {
            tracing::warn!(count = unassigned.len(), "jobs assigned to unknown members");
        }

        let schedules: BTreeMap<String, Vec<ScheduledJob>> = members
            .iter()
            .map(|m| (m.member.clone(), m.active_schedule()))
            .collect();
        let capacity: BTreeMap<String, Vec<CapacityDay>> = members
            .iter()
            .map(|m| (m.member.clone(), m.capacity_days.clone()))
            .collect();
        let overtime = analyze(&schedules, &capacity, self.options.today);
        let summary = summarize(&members);

        TeamPlan {
            jobs,
            members,
            failures,
            unassigned,
            summary,
            overtime,
        }
    }

    fn plan_member(
        &self,
        person: &Person,
        calendar: CalendarConfig,
        jobs: &[&Job],
    ) -> Result<MemberPlan, ScheduleError> {
        let capacity_days = calendar.capacity_days(person.daily_hours, self.options.horizon_days)?;

        let (active, on_hold): (Vec<Job>, Vec<Job>) =
            jobs.iter().map(|j| (*j).clone()).partition(Job::is_active);

        let active_schedule = schedule(&active, &capacity_days)?;
        // Hold work never fails a member; the backlog view falls back to active work only
        let backlog_schedule = match schedule(&backlog_queue(&active, &on_hold), &capacity_days) {
            Ok(backlog) => backlog,
            Err(e) => {
                tracing::warn!(member = %person.name, "cannot queue on-hold backlog: {e}");
                active_schedule.clone()
            }
        };

        let next_available_active =
            next_available_date(&active_schedule, &capacity_days, calendar.start_date);
        let next_available_with_backlog =
            next_available_date(&backlog_schedule, &capacity_days, calendar.start_date);

        let schedule = active_schedule
            .into_iter()
            .map(|item| ScheduleRow {
                due_status: item.due_status(),
                item,
            })
            .collect();

        Ok(MemberPlan {
            member: person.name.clone(),
            daily_hours: person.daily_hours,
            calendar,
            schedule,
            on_hold,
            next_available_active,
            next_available_with_backlog,
            capacity_days,
            backlog_schedule,
        })
    }
}

fn summarize(members: &[MemberPlan]) -> TeamSummary {
    let active = members.iter().flat_map(|m| m.schedule.iter());
    TeamSummary {
        forecast_finish: active.clone().map(|r| r.item.finish_date).max(),
        active_hours: active.clone().map(|r| r.item.job.required_hours).sum(),
        total_jobs: members
            .iter()
            .map(|m| m.schedule.len() + m.on_hold.len())
            .sum(),
        active_members: members.iter().filter(|m| !m.schedule.is_empty()).count(),
    }
}
