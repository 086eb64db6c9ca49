//! Typed records for jobs, people and their calendars.

mod calendar;
mod job;
mod person;

pub use calendar::{CalendarConfig, WorkWeek};
pub use job::{clean_jobs, Job, JobStatus};
pub use person::{clean_team, default_team, Person, MIN_DAILY_HOURS};
