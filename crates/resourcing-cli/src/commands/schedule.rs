use chrono::NaiveDate;
use serde_json::json;

use super::{print_json, CliResult, Session};

pub fn run(member: Option<String>, today: Option<NaiveDate>) -> CliResult {
    let session = Session::open(today)?;
    let plan = session.plan()?;

    if let Some(member) = member {
        if let Some(error) = plan.failures.get(&member) {
            return Err(error.clone().into());
        }
        let mp = plan
            .member(&member)
            .ok_or_else(|| format!("unknown team member: {member}"))?;
        return print_json(&json!({
            "member": mp.member,
            "schedule": mp.schedule,
            "on_hold": mp.on_hold,
        }));
    }

    let members: Vec<_> = plan
        .members
        .iter()
        .map(|mp| {
            json!({
                "member": mp.member,
                "schedule": mp.schedule,
                "on_hold": mp.on_hold,
            })
        })
        .collect();
    print_json(&json!({
        "members": members,
        "failures": plan.failures,
        "unassigned": plan.unassigned,
    }))
}
