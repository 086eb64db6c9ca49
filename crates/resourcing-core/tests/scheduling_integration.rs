//! Integration tests for the calendar -> normalize -> schedule -> occupancy
//! pipeline, driven through the public API and the team planner.

use chrono::{NaiveDate, Weekday};
use resourcing_core::occupancy::{allocate, day_job_details};
use resourcing_core::{
    normalize, schedule, CalendarConfig, DayStatus, DueStatus, Job, OccupancyMode, Person,
    PlanDb, PlanOptions, ScheduleError, TeamInput, TeamPlanner, WorkWeek,
};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, d).unwrap()
}

fn monday_calendar() -> CalendarConfig {
    CalendarConfig::starting(date(3, 2))
}

#[test]
fn test_two_job_week() {
    let days = monday_calendar().capacity_days(8.0, 30).unwrap();
    let jobs = normalize(vec![
        Job::new("A", 16.0, 1, "SL"),
        Job::new("B", 8.0, 2, "SL"),
    ]);
    let sched = schedule(&jobs, &days).unwrap();

    assert_eq!(sched[0].start_date, date(3, 2));
    assert_eq!(sched[0].finish_date, date(3, 3));
    assert_eq!(sched[1].start_date, date(3, 4));
    assert_eq!(sched[1].finish_date, date(3, 4));

    let occ = allocate(&sched, &days, 20);
    assert_eq!(occ[3].date, date(3, 5));
    assert_eq!(occ[3].free_hours, 8.0);
    assert_eq!(occ[4].free_hours, 8.0);
    assert_eq!(occ[2].status(), DayStatus::Full);
}

#[test]
fn test_empty_job_list_leaves_calendar_free() {
    let days = monday_calendar().capacity_days(8.0, 30).unwrap();
    let sched = schedule(&[], &days).unwrap();
    assert!(sched.is_empty());

    let occ = allocate(&sched, &days, 20);
    assert!(occ.iter().all(|d| d.free_hours == d.available_hours));
    let details = day_job_details(&sched, &days, 20);
    assert!(details.values().all(Vec::is_empty));
}

#[test]
fn test_leave_and_unavailability_shift_work() {
    let mut calendar = monday_calendar().with_leave([date(3, 3)]);
    calendar.add_unavailable(date(3, 4), 4.0);
    let days = calendar.capacity_days(8.0, 30).unwrap();
    let sched = schedule(
        &[Job::new("A", 16.0, 1, "SL"), Job::new("B", 8.0, 2, "SL")],
        &days,
    )
    .unwrap();

    assert_eq!(sched[0].finish_date, date(3, 5));
    assert_eq!(sched[1].start_date, date(3, 5));
    assert_eq!(sched[1].finish_date, date(3, 6));
}

#[test]
fn test_weekend_worker() {
    let calendar = monday_calendar().with_weekdays(WorkWeek::from_days([Weekday::Sat, Weekday::Sun]));
    let days = calendar.capacity_days(6.0, 14).unwrap();
    assert_eq!(days[0].date, date(3, 7));
    let sched = schedule(&[Job::new("A", 9.0, 1, "SL")], &days).unwrap();
    assert_eq!(sched[0].start_date, date(3, 7));
    assert_eq!(sched[0].finish_date, date(3, 8));
}

#[test]
fn test_no_working_days_is_reported() {
    let days = monday_calendar()
        .with_weekdays(WorkWeek::from_days([Weekday::Sat]))
        .capacity_days(8.0, 5)
        .unwrap();
    assert!(days.is_empty());
    let err = schedule(&[Job::new("A", 1.0, 1, "SL")], &days).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::NoCapacity {
            assignee: "SL".into()
        }
    );
}

#[test]
fn test_due_status_per_job() {
    let days = monday_calendar().capacity_days(8.0, 30).unwrap();
    let jobs = vec![
        Job::new("A", 8.0, 1, "SL").with_due_date(date(3, 3)),
        Job::new("B", 8.0, 2, "SL").with_due_date(date(3, 3)),
        Job::new("C", 8.0, 3, "SL").with_due_date(date(3, 3)),
    ];
    let sched = schedule(&jobs, &days).unwrap();
    let statuses: Vec<_> = sched.iter().map(|s| s.due_status()).collect();
    assert_eq!(
        statuses,
        vec![
            Some(DueStatus::Ahead),
            Some(DueStatus::OnTime),
            Some(DueStatus::Late)
        ]
    );
}

#[test]
fn test_planner_over_stored_state() {
    let db = PlanDb::open_memory().unwrap();
    db.ensure_team().unwrap();
    db.set_calendar("SL", date(3, 2), WorkWeek::weekdays()).unwrap();
    db.add_job(Job::new("A", 16.0, 1, "SL")).unwrap();
    db.add_job(Job::new("B", 8.0, 2, "SL")).unwrap();
    db.add_job(Job::new("Parked", 4.0, 0, "SL").with_due_date(date(3, 20)))
        .unwrap();

    let input = db.load_input(&monday_calendar()).unwrap();
    let plan = TeamPlanner::new(PlanOptions::new(date(3, 2))).plan(&input);

    let sl = plan.member("SL").unwrap();
    assert_eq!(sl.schedule.len(), 2);
    assert_eq!(sl.next_available_active, date(3, 5));
    assert_eq!(sl.next_available_with_backlog, date(3, 6));

    let backlog = sl.calendar_view(OccupancyMode::WithBacklog, 5);
    assert_eq!(backlog[3].occupancy.allocated_hours, 4.0);
    assert_eq!(backlog[3].jobs, vec!["Parked (4.0h)".to_string()]);

    assert_eq!(plan.summary.total_jobs, 3);
    assert_eq!(plan.summary.active_members, 1);
    assert!(plan.failures.is_empty());
}

#[test]
fn test_planner_isolates_invalid_member() {
    let input = TeamInput {
        team: vec![Person::new("SL", 8.0), Person::new("LS", 0.5)],
        jobs: vec![Job::new("A", 4.0, 1, "SL"), Job::new("B", 4.0, 1, "LS")],
        calendars: Default::default(),
    };
    let plan = TeamPlanner::new(PlanOptions::new(date(3, 2))).plan(&input);
    assert!(matches!(
        plan.failures.get("LS"),
        Some(ScheduleError::InvalidInput { .. })
    ));
    assert_eq!(plan.member("SL").unwrap().schedule.len(), 1);
}
