//! Member calendar commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use resourcing_core::storage::MANUAL_SOURCE;
use resourcing_core::WorkWeek;
use serde_json::json;

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Show a member's calendar settings
    Show {
        member: String,
    },
    /// Change start date and/or working weekdays
    Set {
        member: String,
        /// First date work can be scheduled
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Comma-separated weekday names, e.g. "Mon,Tue,Thu"
        #[arg(long)]
        weekdays: Option<WorkWeek>,
    },
    /// Block whole dates (leave, shutdown)
    LeaveAdd {
        member: String,
        #[arg(required = true)]
        dates: Vec<NaiveDate>,
    },
    /// Unblock dates
    LeaveRemove {
        member: String,
        #[arg(required = true)]
        dates: Vec<NaiveDate>,
    },
    /// Record hours already taken on a date (0 removes the entry)
    Unavailable {
        member: String,
        date: NaiveDate,
        hours: f64,
        /// Feed the hours come from
        #[arg(long, default_value = MANUAL_SOURCE)]
        source: String,
    },
    /// Remove partial-day unavailability
    ClearUnavailable {
        member: String,
        /// Only entries from this feed
        #[arg(long)]
        source: Option<String>,
    },
}

fn show(session: &Session, member: &str) -> CliResult {
    let calendar = session.db.calendar(member, &session.default_calendar())?;
    let entries = session.db.unavailable_entries(member)?;
    print_json(&json!({
        "member": member,
        "calendar": calendar,
        "working_weekdays_label": calendar.working_weekdays.to_string(),
        "unavailable_entries": entries,
    }))
}

pub fn run(action: CalendarAction, today: Option<NaiveDate>) -> CliResult {
    let session = Session::open(today)?;
    let db = &session.db;

    match action {
        CalendarAction::Show { member } => show(&session, &member)?,
        CalendarAction::Set {
            member,
            start,
            weekdays,
        } => {
            let current = db.calendar(&member, &session.default_calendar())?;
            db.set_calendar(
                &member,
                start.unwrap_or(current.start_date),
                weekdays.unwrap_or(current.working_weekdays),
            )?;
            show(&session, &member)?;
        }
        CalendarAction::LeaveAdd { member, dates } => {
            for date in dates {
                if !db.add_leave(&member, date)? {
                    eprintln!("note: {date} already blocked for {member}");
                }
            }
            show(&session, &member)?;
        }
        CalendarAction::LeaveRemove { member, dates } => {
            for date in dates {
                if !db.remove_leave(&member, date)? {
                    eprintln!("note: {date} was not blocked for {member}");
                }
            }
            show(&session, &member)?;
        }
        CalendarAction::Unavailable {
            member,
            date,
            hours,
            source,
        } => {
            db.set_unavailable(&member, date, hours, &source)?;
            show(&session, &member)?;
        }
        CalendarAction::ClearUnavailable { member, source } => {
            let removed = db.clear_unavailable(&member, source.as_deref())?;
            print_json(&json!({ "member": member, "removed": removed }))?;
        }
    }
    Ok(())
}
