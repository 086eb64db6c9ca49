//! Whole-state export and import.

use chrono::NaiveDate;
use clap::Subcommand;
use resourcing_core::StateSnapshot;
use std::path::PathBuf;

use super::{CliResult, Session};

#[derive(Subcommand)]
pub enum StateAction {
    /// Write team, jobs and calendars as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace all stored state with a JSON snapshot
    Import {
        /// Snapshot file
        file: PathBuf,
    },
}

pub fn run(action: StateAction, today: Option<NaiveDate>) -> CliResult {
    let session = Session::open(today)?;

    match action {
        StateAction::Export { output } => {
            let json = session
                .db
                .export_snapshot(&session.default_calendar())?
                .to_json()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    eprintln!("exported state to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        StateAction::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let snapshot = StateSnapshot::from_json(&content, session.today)?;
            session.db.import_snapshot(&snapshot)?;
            println!(
                "imported {} member(s) and {} job(s)",
                snapshot.team.len(),
                snapshot.jobs.len()
            );
        }
    }
    Ok(())
}
