pub mod availability;
pub mod calendar;
pub mod config;
pub mod health;
pub mod job;
pub mod schedule;
pub mod state;
pub mod team;

use chrono::{Local, NaiveDate};
use resourcing_core::{CalendarConfig, Config, PlanDb, PlanOptions, TeamPlan, TeamPlanner};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Config, database and reference date shared by the commands.
pub struct Session {
    pub config: Config,
    pub db: PlanDb,
    pub today: NaiveDate,
}

impl Session {
    /// Load config, open the database and seed the default team if empty.
    pub fn open(today: Option<NaiveDate>) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let db = PlanDb::open()?;
        db.ensure_team()?;
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        tracing::debug!(%today, horizon_days = config.planning.horizon_days, "session opened");
        Ok(Self { config, db, today })
    }

    /// Calendar used for members without saved settings.
    pub fn default_calendar(&self) -> CalendarConfig {
        CalendarConfig::starting(self.today).with_weekdays(self.config.defaults.working_weekdays)
    }

    pub fn plan(&self) -> Result<TeamPlan, Box<dyn std::error::Error>> {
        let input = self.db.load_input(&self.default_calendar())?;
        let planner = TeamPlanner::new(PlanOptions {
            horizon_days: self.config.planning.horizon_days,
            today: self.today,
        });
        Ok(planner.plan(&input))
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
