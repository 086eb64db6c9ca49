//! Job management commands for CLI.

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use resourcing_core::{Job, JobStatus};

use super::{print_json, CliResult, Session};

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusFilter {
    Active,
    OnHold,
}

impl StatusFilter {
    fn matches(self, status: JobStatus) -> bool {
        matches!(
            (self, status),
            (StatusFilter::Active, JobStatus::Active) | (StatusFilter::OnHold, JobStatus::OnHold)
        )
    }
}

#[derive(Subcommand)]
pub enum JobAction {
    /// Add a job
    Add {
        /// Job name
        name: String,
        /// Required hours
        #[arg(long)]
        hours: f64,
        /// Team member doing the work
        #[arg(long)]
        assignee: String,
        /// Queue position, 0 = on hold (default: 1)
        #[arg(long, default_value_t = 1)]
        priority: u32,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List jobs in queue order
    List {
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,
    },
    /// Update a job
    Update {
        /// Job ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        priority: Option<u32>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a job
    Delete {
        /// Job ID
        id: String,
    },
}

fn require_member(session: &Session, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    if session.db.person(name)?.is_none() {
        return Err(format!("unknown team member: {name}").into());
    }
    Ok(())
}

pub fn run(action: JobAction) -> CliResult {
    let session = Session::open(None)?;
    let db = &session.db;

    match action {
        JobAction::Add {
            name,
            hours,
            assignee,
            priority,
            due,
            notes,
        } => {
            require_member(&session, &assignee)?;
            let mut job = Job::new(name.trim(), hours, priority, assignee).with_notes(notes);
            job.due_date = due;
            let id = job.id.clone();
            let jobs = db.add_job(job)?;
            let stored = jobs.iter().find(|j| j.id == id);
            print_json(&stored)?;
        }
        JobAction::List { assignee, status } => {
            let jobs: Vec<Job> = db
                .list_jobs()?
                .into_iter()
                .filter(|j| assignee.as_deref().map_or(true, |a| j.assignee == a))
                .filter(|j| status.map_or(true, |s| s.matches(j.status())))
                .collect();
            print_json(&jobs)?;
        }
        JobAction::Update {
            id,
            name,
            hours,
            assignee,
            priority,
            due,
            clear_due,
            notes,
        } => {
            let mut job = db
                .job(&id)?
                .ok_or_else(|| format!("job not found: {id}"))?;
            if let Some(name) = name {
                job.name = name.trim().to_string();
            }
            if let Some(hours) = hours {
                job.required_hours = hours;
            }
            if let Some(assignee) = assignee {
                require_member(&session, &assignee)?;
                job.assignee = assignee;
            }
            if let Some(priority) = priority {
                job.priority = priority;
            }
            if clear_due {
                job.due_date = None;
            } else if due.is_some() {
                job.due_date = due;
            }
            if let Some(notes) = notes {
                job.notes = notes;
            }
            let jobs = db.update_job(job)?;
            print_json(&jobs.iter().find(|j| j.id == id))?;
        }
        JobAction::Delete { id } => {
            db.delete_job(&id)?;
            println!("Job deleted: {id}");
        }
    }
    Ok(())
}
