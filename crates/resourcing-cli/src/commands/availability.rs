//! Free capacity and next-available commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use resourcing_core::OccupancyMode;
use serde_json::json;

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum AvailabilityAction {
    /// Next available dates per member and team totals
    Summary,
    /// Day-by-day allocation for one member
    Calendar {
        member: String,
        /// Capacity days to show (default: planning.calendar_days)
        #[arg(long)]
        days: Option<usize>,
        /// Count on-hold jobs queued after active work
        #[arg(long)]
        with_backlog: bool,
    },
}

pub fn run(action: AvailabilityAction, today: Option<NaiveDate>) -> CliResult {
    let session = Session::open(today)?;
    let plan = session.plan()?;

    match action {
        AvailabilityAction::Summary => {
            let members: Vec<_> = plan
                .members
                .iter()
                .map(|mp| {
                    json!({
                        "member": mp.member,
                        "daily_hours": mp.daily_hours,
                        "active_jobs": mp.schedule.len(),
                        "on_hold_jobs": mp.on_hold.len(),
                        "next_available_active": mp.next_available_active,
                        "next_available_with_backlog": mp.next_available_with_backlog,
                    })
                })
                .collect();
            print_json(&json!({
                "summary": plan.summary,
                "members": members,
                "failures": plan.failures,
            }))?;
        }
        AvailabilityAction::Calendar {
            member,
            days,
            with_backlog,
        } => {
            if let Some(error) = plan.failures.get(&member) {
                return Err(error.clone().into());
            }
            let mp = plan
                .member(&member)
                .ok_or_else(|| format!("unknown team member: {member}"))?;
            let mode = if with_backlog {
                OccupancyMode::WithBacklog
            } else {
                OccupancyMode::ActiveOnly
            };
            let days = days.unwrap_or(session.config.planning.calendar_days);
            print_json(&json!({
                "member": mp.member,
                "mode": mode,
                "days": mp.calendar_view(mode, days),
            }))?;
        }
    }
    Ok(())
}
