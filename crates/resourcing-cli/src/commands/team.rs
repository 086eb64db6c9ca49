//! Team management commands for CLI.

use clap::Subcommand;
use resourcing_core::Person;

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum TeamAction {
    /// Add a team member
    Add {
        /// Member name (unique)
        name: String,
        /// Hours in a full working day (default: defaults.daily_hours)
        #[arg(long)]
        daily_hours: Option<f64>,
    },
    /// List team members
    List,
    /// Remove a team member and their calendar
    Remove {
        name: String,
    },
    /// Change a member's daily hours
    SetHours {
        name: String,
        daily_hours: f64,
    },
}

pub fn run(action: TeamAction) -> CliResult {
    let session = Session::open(None)?;
    let db = &session.db;

    match action {
        TeamAction::Add { name, daily_hours } => {
            let person = Person::new(
                name.trim(),
                daily_hours.unwrap_or(session.config.defaults.daily_hours),
            );
            db.add_person(&person)?;
            print_json(&person)?;
        }
        TeamAction::List => {
            print_json(&db.list_team()?)?;
        }
        TeamAction::Remove { name } => {
            db.remove_person(&name)?;
            let orphaned = db.list_jobs()?.into_iter().filter(|j| j.assignee == name).count();
            if orphaned > 0 {
                eprintln!("note: {orphaned} job(s) still assigned to {name}");
            }
            print_json(&db.list_team()?)?;
        }
        TeamAction::SetHours { name, daily_hours } => {
            db.set_daily_hours(&name, daily_hours)?;
            print_json(&db.person(&name)?)?;
        }
    }
    Ok(())
}
