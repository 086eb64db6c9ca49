//! # Resourcing Core Library
//!
//! Capacity-aware job scheduling and overtime analysis for a small team.
//! Every operation is available through the standalone `resourcing` CLI,
//! which is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Capacity**: per-person working calendars reduced to dated hour
//!   segments, with leave and partial-day unavailability taken out
//! - **Scheduling**: per-assignee priority normalization and sequential
//!   placement of jobs onto those segments
//! - **Analysis**: per-day occupancy, overtime against due dates and a
//!   team-level delivery health state
//! - **Storage**: SQLite plan database, TOML configuration and JSON state
//!   snapshots
//!
//! ## Key Components
//!
//! - [`TeamPlanner`]: runs the whole engine over a team snapshot
//! - [`schedule`]: places one assignee's active jobs on their calendar
//! - [`analyze`]: overtime and health across the team
//! - [`PlanDb`]: persistence for team, jobs and calendars
//! - [`Config`]: application configuration management

pub mod capacity;
pub mod error;
pub mod model;
pub mod occupancy;
pub mod overtime;
pub mod plan;
pub mod priority;
pub mod scheduler;
pub mod storage;

pub use capacity::{build_capacity_days, CapacityDay, CapacitySegment, SegmentIndex};
pub use error::{ConfigError, CoreError, DatabaseError, ScheduleError, ValidationError};
pub use model::{CalendarConfig, Job, JobStatus, Person, WorkWeek};
pub use occupancy::{DayOccupancy, DayStatus};
pub use overtime::{analyze, HealthState, OvertimeReport};
pub use plan::{OccupancyMode, PlanOptions, TeamInput, TeamPlan, TeamPlanner};
pub use priority::normalize;
pub use scheduler::{schedule, DueStatus, ScheduledJob};
pub use storage::{Config, PlanDb, StateSnapshot};
