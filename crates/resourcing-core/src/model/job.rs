//! Job records.
//!
//! A job is one unit of prioritized work owned by a single assignee.
//! Priority 0 parks the job on hold; any priority of 1 or more makes it
//! active and places it in the assignee's queue.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

fn new_job_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Whether a job takes part in scheduling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Priority 1 or higher
    Active,
    /// Priority 0
    OnHold,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Active => write!(f, "Active"),
            JobStatus::OnHold => write!(f, "On hold"),
        }
    }
}

/// A unit of work assigned to one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default = "new_job_id")]
    pub id: String,
    pub name: String,
    pub required_hours: f64,
    /// 0 = on hold, 1.. = rank within the assignee's queue
    pub priority: u32,
    pub assignee: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

impl Job {
    /// Create a job with a fresh id, no due date and empty notes.
    pub fn new(
        name: impl Into<String>,
        required_hours: f64,
        priority: u32,
        assignee: impl Into<String>,
    ) -> Self {
        Self {
            id: new_job_id(),
            name: name.into(),
            required_hours,
            priority,
            assignee: assignee.into(),
            due_date: None,
            notes: String::new(),
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn status(&self) -> JobStatus {
        if self.priority >= 1 {
            JobStatus::Active
        } else {
            JobStatus::OnHold
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == JobStatus::Active
    }

    /// Name used in per-day labels.
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "Unnamed job"
        } else {
            trimmed
        }
    }

    /// Check the record before it enters the engine.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for an empty name or assignee, or for
    /// required hours that are negative or not finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if self.assignee.trim().is_empty() {
            return Err(ValidationError::EmptyField("assignee"));
        }
        if !self.required_hours.is_finite() || self.required_hours < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "required_hours".into(),
                message: format!("expected a finite value >= 0, got {}", self.required_hours),
            });
        }
        Ok(())
    }
}

/// Drop jobs that fail [`Job::validate`], keeping the order of the rest.
pub fn clean_jobs(jobs: impl IntoIterator<Item = Job>) -> Vec<Job> {
    jobs.into_iter()
        .filter(|job| match job.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(job = %job.name, assignee = %job.assignee, "dropping job: {e}");
                false
            }
        })
        .collect()
}
