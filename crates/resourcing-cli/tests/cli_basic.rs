//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a throwaway data directory and check
//! its JSON output.

use serde_json::Value;
use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_resourcing"))
        .env("RESOURCING_DATA_DIR", data_dir)
        .env_remove("RESOURCING_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

/// Single-member team starting Monday 2026-03-02 with A (16h) then B (8h).
fn solo_team(data_dir: &Path) {
    run_json(data_dir, &["team", "remove", "LS"]);
    run_json(data_dir, &["team", "remove", "LB"]);
    run_json(data_dir, &["calendar", "set", "SL", "--start", "2026-03-02"]);
    run_json(
        data_dir,
        &["job", "add", "Job A", "--hours", "16", "--assignee", "SL", "--priority", "1"],
    );
    run_json(
        data_dir,
        &["job", "add", "Job B", "--hours", "8", "--assignee", "SL", "--priority", "2"],
    );
}

#[test]
fn test_default_team_is_seeded() {
    let dir = tempfile::tempdir().unwrap();
    let team = run_json(dir.path(), &["team", "list"]);
    let names: Vec<&str> = team
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["SL", "LS", "LB"]);
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_team_add_and_set_hours() {
    let dir = tempfile::tempdir().unwrap();
    let added = run_json(dir.path(), &["team", "add", "JD", "--daily-hours", "6"]);
    assert_eq!(added["daily_hours"], 6.0);
    let updated = run_json(dir.path(), &["team", "set-hours", "JD", "7.5"]);
    assert_eq!(updated["daily_hours"], 7.5);

    let (_, stderr, code) = run_cli(dir.path(), &["team", "set-hours", "JD", "0.5"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_schedule_places_jobs_in_priority_order() {
    let dir = tempfile::tempdir().unwrap();
    solo_team(dir.path());

    let out = run_json(dir.path(), &["schedule", "--member", "SL"]);
    let rows = out["schedule"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Job A");
    assert_eq!(rows[0]["start_date"], "2026-03-02");
    assert_eq!(rows[0]["finish_date"], "2026-03-03");
    assert_eq!(rows[1]["name"], "Job B");
    assert_eq!(rows[1]["finish_date"], "2026-03-04");
}

#[test]
fn test_job_priority_insert_pushes_others_down() {
    let dir = tempfile::tempdir().unwrap();
    solo_team(dir.path());
    run_json(
        dir.path(),
        &["job", "add", "Rush", "--hours", "2", "--assignee", "SL", "--priority", "1"],
    );

    let jobs = run_json(dir.path(), &["job", "list", "--assignee", "SL"]);
    let ranks: Vec<(String, u64)> = jobs
        .as_array()
        .unwrap()
        .iter()
        .map(|j| {
            (
                j["name"].as_str().unwrap().to_string(),
                j["priority"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        ranks,
        vec![
            ("Rush".to_string(), 1),
            ("Job A".to_string(), 2),
            ("Job B".to_string(), 3)
        ]
    );
}

#[test]
fn test_job_update_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    solo_team(dir.path());
    let jobs = run_json(dir.path(), &["job", "list"]);
    let id = jobs[0]["id"].as_str().unwrap().to_string();

    let updated = run_json(
        dir.path(),
        &["job", "update", &id, "--priority", "0", "--due", "2026-04-01"],
    );
    assert_eq!(updated["priority"], 0);
    assert_eq!(updated["due_date"], "2026-04-01");

    let on_hold = run_json(dir.path(), &["job", "list", "--status", "on-hold"]);
    assert_eq!(on_hold.as_array().unwrap().len(), 1);

    let (_, _, code) = run_cli(dir.path(), &["job", "delete", &id]);
    assert_eq!(code, 0);
    let (_, stderr, code) = run_cli(dir.path(), &["job", "delete", &id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_job_for_unknown_member_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["job", "add", "X", "--hours", "1", "--assignee", "ZZ"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown team member"));
}

#[test]
fn test_availability_calendar_shows_free_days() {
    let dir = tempfile::tempdir().unwrap();
    solo_team(dir.path());

    let out = run_json(
        dir.path(),
        &["availability", "calendar", "SL", "--days", "5"],
    );
    let free: Vec<f64> = out["days"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["free_hours"].as_f64().unwrap())
        .collect();
    assert_eq!(free, vec![0.0, 0.0, 0.0, 8.0, 8.0]);
    assert_eq!(out["days"][0]["status"], "full");
    assert_eq!(out["days"][3]["status"], "free");

    let summary = run_json(dir.path(), &["availability", "summary"]);
    assert_eq!(summary["members"][0]["next_available_active"], "2026-03-05");
    assert_eq!(summary["summary"]["forecast_finish"], "2026-03-04");
}

#[test]
fn test_leave_shifts_schedule() {
    let dir = tempfile::tempdir().unwrap();
    solo_team(dir.path());
    run_json(dir.path(), &["calendar", "leave-add", "SL", "2026-03-03"]);
    run_json(
        dir.path(),
        &["calendar", "unavailable", "SL", "2026-03-04", "4"],
    );

    // Mon 8h, Tue off, Wed 4h, Thu 8h, Fri 8h
    let out = run_json(dir.path(), &["schedule", "--member", "SL"]);
    assert_eq!(out["schedule"][0]["finish_date"], "2026-03-05");
    assert_eq!(out["schedule"][1]["finish_date"], "2026-03-06");
}

#[test]
fn test_health_reports_critical_overrun() {
    let dir = tempfile::tempdir().unwrap();
    solo_team(dir.path());
    let jobs = run_json(dir.path(), &["job", "list"]);
    let id = jobs[0]["id"].as_str().unwrap().to_string();
    run_json(dir.path(), &["job", "update", &id, "--due", "2026-03-02"]);

    let out = run_json(dir.path(), &["--today", "2026-03-02", "health"]);
    assert_eq!(out["health"], "critical");
    assert_eq!(out["overtime_needed"], 8.0);
    assert_eq!(out["per_assignee"]["SL"], 8.0);
}

#[test]
fn test_health_is_healthy_without_due_dates() {
    let dir = tempfile::tempdir().unwrap();
    solo_team(dir.path());
    let out = run_json(dir.path(), &["health", "--today", "2026-03-02"]);
    assert_eq!(out["health"], "healthy");
    assert_eq!(out["overtime_needed"], 0.0);
}

#[test]
fn test_config_set_get_reset() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "planning.calendar_days"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "20");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "planning.calendar_days", "7"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "planning.calendar_days"]);
    assert_eq!(stdout.trim(), "7");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "planning.nope", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key"));

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let listed = run_json(dir.path(), &["config", "list"]);
    assert_eq!(listed["planning"]["calendar_days"], 20);
}

#[test]
fn test_state_export_import_roundtrip() {
    let source = tempfile::tempdir().unwrap();
    solo_team(source.path());
    let file = source.path().join("state.json");
    let (_, _, code) = run_cli(
        source.path(),
        &["state", "export", "--output", file.to_str().unwrap()],
    );
    assert_eq!(code, 0);

    let target = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(target.path(), &["state", "import", file.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("imported 1 member(s) and 2 job(s)"));

    let out = run_json(target.path(), &["schedule", "--member", "SL"]);
    assert_eq!(out["schedule"][1]["finish_date"], "2026-03-04");
}
