use chrono::NaiveDate;
use serde_json::json;

use super::{print_json, CliResult, Session};

pub fn run(today: Option<NaiveDate>) -> CliResult {
    let session = Session::open(today)?;
    let plan = session.plan()?;
    let report = &plan.overtime;

    print_json(&json!({
        "today": session.today,
        "health": report.health,
        "health_label": report.health.to_string(),
        "overtime_needed": report.overtime_needed,
        "per_assignee": report.per_assignee,
        "overloaded": report.overloaded,
        "violated_due_dates": report.violated_due_dates,
        "offset_capacity_earliest": report.offset_capacity_earliest,
        "offset_capacity_latest": report.offset_capacity_latest,
        "deficits": report.deficits,
        "failures": plan.failures,
    }))
}
