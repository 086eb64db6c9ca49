//! Property tests for the scheduling engine.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use resourcing_core::occupancy::allocate;
use resourcing_core::{
    build_capacity_days, normalize, schedule, CalendarConfig, HealthState, Job, Person,
    PlanOptions, TeamInput, TeamPlanner, WorkWeek,
};
use std::collections::{BTreeMap, BTreeSet};

const TOLERANCE: f64 = 1e-6;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn job_strategy(assignees: &'static [&'static str]) -> impl Strategy<Value = Job> {
    (
        0usize..assignees.len(),
        0.0f64..40.0,
        0u32..6,
        "[a-e]{1,3}",
        proptest::option::of(0i64..30),
    )
        .prop_map(move |(who, hours, priority, name, due)| {
            let mut job = Job::new(name, hours, priority, assignees[who]);
            job.due_date = due.map(|d| monday() + Duration::days(d));
            job
        })
}

proptest! {
    #[test]
    fn capacity_days_stay_within_daily_hours(
        daily in 1.0f64..16.0,
        mask in proptest::collection::vec(0i64..7, 0..7),
        leave in proptest::collection::btree_set(0i64..60, 0..10),
        unavailable in proptest::collection::btree_map(0i64..60, 0.0f64..20.0, 0..10),
        horizon in 1u32..90,
    ) {
        let week = WorkWeek::from_indices_lossy(mask);
        let leave: BTreeSet<NaiveDate> = leave.into_iter().map(|d| monday() + Duration::days(d)).collect();
        let unavailable: BTreeMap<NaiveDate, f64> = unavailable
            .into_iter()
            .map(|(d, h)| (monday() + Duration::days(d), h))
            .collect();
        let days = build_capacity_days(monday(), week, &leave, daily, &unavailable, horizon).unwrap();
        for pair in days.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
        }
        for day in &days {
            prop_assert!(day.available_hours > 0.0);
            prop_assert!(day.available_hours <= daily);
            prop_assert!(!leave.contains(&day.date));
        }
    }

    #[test]
    fn intervals_are_gapless(jobs in proptest::collection::vec(job_strategy(&["SL"]), 1..12)) {
        let active: Vec<Job> = normalize(jobs).into_iter().filter(Job::is_active).collect();
        let days = CalendarConfig::starting(monday()).capacity_days(8.0, 400).unwrap();
        let sched = schedule(&active, &days).unwrap();
        if let Some(first) = sched.first() {
            prop_assert_eq!(first.start_hour, 0.0);
        }
        for pair in sched.windows(2) {
            prop_assert_eq!(pair[0].finish_hour, pair[1].start_hour);
            prop_assert!(pair[0].start_date <= pair[1].start_date);
            prop_assert!(pair[0].job.priority <= pair[1].job.priority);
        }
    }

    #[test]
    fn occupancy_conserves_hours(jobs in proptest::collection::vec(job_strategy(&["SL"]), 0..12)) {
        let active: Vec<Job> = normalize(jobs).into_iter().filter(Job::is_active).collect();
        let mut calendar = CalendarConfig::starting(monday());
        calendar.add_unavailable(monday() + Duration::days(1), 3.5);
        let days = calendar.capacity_days(8.0, 400).unwrap();
        let sched = schedule(&active, &days).unwrap();

        let occ = allocate(&sched, &days, days.len());
        for (day, cap) in occ.iter().zip(&days) {
            prop_assert!((day.allocated_hours + day.free_hours - cap.available_hours).abs() < TOLERANCE);
        }
        let allocated: f64 = occ.iter().map(|d| d.allocated_hours).sum();
        let required: f64 = active.iter().map(|j| j.required_hours).sum();
        prop_assert!((allocated - required).abs() < TOLERANCE);
    }

    #[test]
    fn normalize_is_idempotent(jobs in proptest::collection::vec(job_strategy(&["SL", "LS", "LB"]), 0..15)) {
        let once = normalize(jobs);
        let twice = normalize(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn more_work_never_heals(
        jobs in proptest::collection::vec(job_strategy(&["SL", "LS"]), 1..8),
        pick in any::<prop::sample::Index>(),
        extra in 0.0f64..40.0,
    ) {
        let team = vec![Person::new("SL", 8.0), Person::new("LS", 8.0)];
        let calendars: BTreeMap<String, CalendarConfig> = team
            .iter()
            .map(|p| (p.name.clone(), CalendarConfig::starting(monday())))
            .collect();
        let planner = TeamPlanner::new(PlanOptions { horizon_days: 400, today: monday() });

        let before_input = TeamInput { team: team.clone(), jobs: jobs.clone(), calendars: calendars.clone() };
        let before = planner.plan(&before_input).overtime;

        let mut grown = jobs;
        let i = pick.index(grown.len());
        grown[i].required_hours += extra;
        let after = planner.plan(&TeamInput { team, jobs: grown, calendars }).overtime;

        prop_assert!(after.overtime_needed + TOLERANCE >= before.overtime_needed);
        if before.health != HealthState::Healthy {
            prop_assert_ne!(after.health, HealthState::Healthy);
        }
    }
}
