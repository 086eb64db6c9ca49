//! SQLite-based storage for the team, jobs and member calendars.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::data_dir;
use super::migrations;
use super::snapshot::StateSnapshot;
use crate::capacity::merge_unavailable_hours;
use crate::error::{DatabaseError, Result, ValidationError};
use crate::model::{clean_jobs, default_team, CalendarConfig, Job, Person, WorkWeek};
use crate::plan::TeamInput;
use crate::priority::normalize;

/// Source tag for hours entered by hand.
pub const MANUAL_SOURCE: &str = "manual";

const DATE_FORMAT: &str = "%Y-%m-%d";

// === Helper Functions ===

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_optional_date(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        NaiveDate::parse_from_str(&s, DATE_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Stored weekday lists are JSON arrays of 0 (Mon) .. 6 (Sun).
fn parse_weekdays(raw: &str) -> WorkWeek {
    let indices: Vec<i64> = serde_json::from_str(raw).unwrap_or_default();
    WorkWeek::from_indices_lossy(indices)
}

fn format_weekdays(week: WorkWeek) -> String {
    let indices: Vec<u8> = week.into();
    serde_json::to_string(&indices).unwrap_or_else(|_| "[0,1,2,3,4]".to_string())
}

fn row_to_job(row: &Row) -> rusqlite::Result<Job> {
    Ok(Job {
        id: row.get(0)?,
        name: row.get(1)?,
        required_hours: row.get(2)?,
        priority: row.get(3)?,
        assignee: row.get(4)?,
        due_date: parse_optional_date(row, 5)?,
        notes: row.get(6)?,
    })
}

fn member_not_found(name: &str) -> DatabaseError {
    DatabaseError::NotFound {
        kind: "member",
        key: name.to_string(),
    }
}

/// One partial-day unavailability row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnavailableEntry {
    pub member: String,
    pub date: NaiveDate,
    pub source: String,
    pub hours: f64,
}

/// SQLite database for the planning state.
pub struct PlanDb {
    conn: Connection,
}

impl PlanDb {
    /// Open the plan database at `~/.config/resourcing/resourcing.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("resourcing.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    // === Team ===

    pub fn list_team(&self) -> Result<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, daily_hours FROM persons ORDER BY position, name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Person {
                name: row.get(0)?,
                daily_hours: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn person(&self, name: &str) -> Result<Option<Person>> {
        let person = self
            .conn
            .query_row(
                "SELECT name, daily_hours FROM persons WHERE name = ?1",
                [name],
                |row| {
                    Ok(Person {
                        name: row.get(0)?,
                        daily_hours: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(person)
    }

    fn require_person(&self, name: &str) -> Result<Person> {
        Ok(self.person(name)?.ok_or_else(|| member_not_found(name))?)
    }

    /// Insert the default team when no member is stored.
    ///
    /// Returns true if the team was seeded.
    pub fn ensure_team(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM persons", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(false);
        }
        for person in default_team() {
            self.add_person(&person)?;
        }
        tracing::info!("seeded default team");
        Ok(true)
    }

    /// Append a member to the team.
    ///
    /// # Errors
    /// Fails validation for an empty name, daily hours below one, or a
    /// name already on the team.
    pub fn add_person(&self, person: &Person) -> Result<()> {
        person.validate()?;
        if self.person(&person.name)?.is_some() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: format!("member '{}' already exists", person.name),
            }
            .into());
        }
        self.conn.execute(
            "INSERT INTO persons (name, daily_hours, position)
             VALUES (?1, ?2, (SELECT COALESCE(MAX(position), -1) + 1 FROM persons))",
            params![person.name, person.daily_hours],
        )?;
        Ok(())
    }

    pub fn set_daily_hours(&self, name: &str, daily_hours: f64) -> Result<()> {
        Person::new(name, daily_hours).validate()?;
        let changed = self.conn.execute(
            "UPDATE persons SET daily_hours = ?2 WHERE name = ?1",
            params![name, daily_hours],
        )?;
        if changed == 0 {
            return Err(member_not_found(name).into());
        }
        Ok(())
    }

    /// Remove a member and their calendar. Their jobs are kept.
    pub fn remove_person(&self, name: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute("DELETE FROM persons WHERE name = ?1", [name])?;
        if changed == 0 {
            return Err(member_not_found(name).into());
        }
        Self::delete_member_calendar(&tx, name)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_member_calendar(tx: &Transaction, name: &str) -> rusqlite::Result<()> {
        tx.execute("DELETE FROM calendars WHERE member = ?1", [name])?;
        tx.execute("DELETE FROM non_working_dates WHERE member = ?1", [name])?;
        tx.execute("DELETE FROM unavailable_hours WHERE member = ?1", [name])?;
        Ok(())
    }

    // === Jobs ===

    /// All jobs in row order.
    pub fn list_jobs(&self) -> Result<Vec<Job>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, required_hours, priority, assignee, due_date, notes
             FROM jobs ORDER BY position",
        )?;
        let rows = stmt.query_map([], row_to_job)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn job(&self, id: &str) -> Result<Option<Job>> {
        let job = self
            .conn
            .query_row(
                "SELECT id, name, required_hours, priority, assignee, due_date, notes
                 FROM jobs WHERE id = ?1",
                [id],
                row_to_job,
            )
            .optional()?;
        Ok(job)
    }

    /// Append a job and write back the normalized snapshot.
    pub fn add_job(&self, job: Job) -> Result<Vec<Job>> {
        job.validate()?;
        let mut jobs = self.list_jobs()?;
        jobs.push(job);
        self.replace_jobs(jobs)
    }

    /// Replace a job in place (same row) and write back the normalized snapshot.
    pub fn update_job(&self, job: Job) -> Result<Vec<Job>> {
        job.validate()?;
        let mut jobs = self.list_jobs()?;
        let slot = jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or_else(|| DatabaseError::NotFound {
                kind: "job",
                key: job.id.clone(),
            })?;
        *slot = job;
        self.replace_jobs(jobs)
    }

    pub fn delete_job(&self, id: &str) -> Result<Vec<Job>> {
        let mut jobs = self.list_jobs()?;
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        if jobs.len() == before {
            return Err(DatabaseError::NotFound {
                kind: "job",
                key: id.to_string(),
            }
            .into());
        }
        self.replace_jobs(jobs)
    }

    /// Clean, normalize and store a whole job snapshot.
    ///
    /// Row order in the store follows the normalized order.
    pub fn replace_jobs(&self, jobs: Vec<Job>) -> Result<Vec<Job>> {
        let normalized = normalize(clean_jobs(jobs));
        let tx = self.conn.unchecked_transaction()?;
        Self::write_jobs(&tx, &normalized)?;
        tx.commit()?;
        tracing::debug!(jobs = normalized.len(), "stored job snapshot");
        Ok(normalized)
    }

    fn write_jobs(tx: &Transaction, jobs: &[Job]) -> rusqlite::Result<()> {
        tx.execute("DELETE FROM jobs", [])?;
        let mut stmt = tx.prepare(
            "INSERT INTO jobs (id, position, name, required_hours, priority, assignee, due_date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for (position, job) in jobs.iter().enumerate() {
            stmt.execute(params![
                job.id,
                position as i64,
                job.name,
                job.required_hours,
                job.priority,
                job.assignee,
                job.due_date.map(format_date),
                job.notes,
            ])?;
        }
        Ok(())
    }

    // === Calendars ===

    /// Calendar for `member`, with `fallback` start date and weekdays when
    /// nothing was saved. Unavailable hours from all sources are summed
    /// and capped at the member's daily hours.
    pub fn calendar(&self, member: &str, fallback: &CalendarConfig) -> Result<CalendarConfig> {
        let person = self.require_person(member)?;
        self.read_calendar(&person, fallback)
    }

    /// Calendars for every team member.
    pub fn calendars(&self, fallback: &CalendarConfig) -> Result<BTreeMap<String, CalendarConfig>> {
        self.list_team()?
            .into_iter()
            .map(|person| {
                let calendar = self.read_calendar(&person, fallback)?;
                Ok((person.name, calendar))
            })
            .collect()
    }

    fn read_calendar(&self, person: &Person, fallback: &CalendarConfig) -> Result<CalendarConfig> {
        let stored = self
            .conn
            .query_row(
                "SELECT start_date, working_weekdays FROM calendars WHERE member = ?1",
                [&person.name],
                |row| {
                    let weekdays: String = row.get(1)?;
                    Ok((parse_date(row, 0)?, parse_weekdays(&weekdays)))
                },
            )
            .optional()?;
        let (start_date, working_weekdays) =
            stored.unwrap_or((fallback.start_date, fallback.working_weekdays));

        let mut stmt = self
            .conn
            .prepare("SELECT date FROM non_working_dates WHERE member = ?1 ORDER BY date")?;
        let non_working_dates = stmt
            .query_map([&person.name], |row| parse_date(row, 0))?
            .collect::<rusqlite::Result<_>>()?;

        let mut by_source: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
        for entry in self.unavailable_entries(&person.name)? {
            by_source
                .entry(entry.source)
                .or_default()
                .insert(entry.date, entry.hours);
        }
        let unavailable_hours = merge_unavailable_hours(by_source.values(), person.daily_hours);

        Ok(CalendarConfig {
            start_date,
            working_weekdays,
            non_working_dates,
            unavailable_hours,
        })
    }

    /// Save the start date and working weekdays for `member`.
    pub fn set_calendar(
        &self,
        member: &str,
        start_date: NaiveDate,
        working_weekdays: WorkWeek,
    ) -> Result<()> {
        self.require_person(member)?;
        if working_weekdays.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "working_weekdays".into(),
                message: "at least one working weekday is required".into(),
            }
            .into());
        }
        self.conn.execute(
            "INSERT INTO calendars (member, start_date, working_weekdays) VALUES (?1, ?2, ?3)
             ON CONFLICT(member) DO UPDATE SET
                start_date = excluded.start_date,
                working_weekdays = excluded.working_weekdays",
            params![member, format_date(start_date), format_weekdays(working_weekdays)],
        )?;
        Ok(())
    }

    /// Block a whole date for `member`. Returns false if it was already blocked.
    pub fn add_leave(&self, member: &str, date: NaiveDate) -> Result<bool> {
        self.require_person(member)?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO non_working_dates (member, date) VALUES (?1, ?2)",
            params![member, format_date(date)],
        )?;
        Ok(inserted > 0)
    }

    /// Unblock a date. Returns false if it was not blocked.
    pub fn remove_leave(&self, member: &str, date: NaiveDate) -> Result<bool> {
        self.require_person(member)?;
        let removed = self.conn.execute(
            "DELETE FROM non_working_dates WHERE member = ?1 AND date = ?2",
            params![member, format_date(date)],
        )?;
        Ok(removed > 0)
    }

    /// Set the hours `source` takes from `member` on `date`.
    ///
    /// Zero hours removes the entry. Each source holds one value per date;
    /// sources are summed when the calendar is read.
    pub fn set_unavailable(
        &self,
        member: &str,
        date: NaiveDate,
        hours: f64,
        source: &str,
    ) -> Result<()> {
        self.require_person(member)?;
        if !hours.is_finite() || hours < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "hours".into(),
                message: format!("expected a finite value >= 0, got {hours}"),
            }
            .into());
        }
        if source.trim().is_empty() {
            return Err(ValidationError::EmptyField("source").into());
        }
        if hours == 0.0 {
            self.conn.execute(
                "DELETE FROM unavailable_hours WHERE member = ?1 AND date = ?2 AND source = ?3",
                params![member, format_date(date), source],
            )?;
        } else {
            self.conn.execute(
                "INSERT INTO unavailable_hours (member, date, source, hours) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(member, date, source) DO UPDATE SET hours = excluded.hours",
                params![member, format_date(date), source, hours],
            )?;
        }
        Ok(())
    }

    /// Drop unavailability for `member`, from one source or all of them.
    pub fn clear_unavailable(&self, member: &str, source: Option<&str>) -> Result<usize> {
        self.require_person(member)?;
        let removed = match source {
            Some(source) => self.conn.execute(
                "DELETE FROM unavailable_hours WHERE member = ?1 AND source = ?2",
                params![member, source],
            )?,
            None => self
                .conn
                .execute("DELETE FROM unavailable_hours WHERE member = ?1", [member])?,
        };
        Ok(removed)
    }

    /// Raw unavailability rows for `member`, by date then source.
    pub fn unavailable_entries(&self, member: &str) -> Result<Vec<UnavailableEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT member, date, source, hours FROM unavailable_hours
             WHERE member = ?1 ORDER BY date, source",
        )?;
        let rows = stmt.query_map([member], |row| {
            Ok(UnavailableEntry {
                member: row.get(0)?,
                date: parse_date(row, 1)?,
                source: row.get(2)?,
                hours: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // === Whole state ===

    /// Everything the planner needs, in one read.
    pub fn load_input(&self, fallback: &CalendarConfig) -> Result<TeamInput> {
        Ok(TeamInput {
            team: self.list_team()?,
            jobs: self.list_jobs()?,
            calendars: self.calendars(fallback)?,
        })
    }

    pub fn export_snapshot(&self, fallback: &CalendarConfig) -> Result<StateSnapshot> {
        let input = self.load_input(fallback)?;
        Ok(StateSnapshot {
            team: input.team,
            jobs: input.jobs,
            calendars: input.calendars,
        })
    }

    /// Replace all stored state with `snapshot`.
    ///
    /// Unavailable hours are stored under [`MANUAL_SOURCE`].
    pub fn import_snapshot(&self, snapshot: &StateSnapshot) -> Result<()> {
        let jobs = normalize(clean_jobs(snapshot.jobs.iter().cloned()));
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(
            "DELETE FROM persons;
             DELETE FROM calendars;
             DELETE FROM non_working_dates;
             DELETE FROM unavailable_hours;",
        )?;

        for (position, person) in snapshot.team.iter().enumerate() {
            tx.execute(
                "INSERT INTO persons (name, daily_hours, position) VALUES (?1, ?2, ?3)",
                params![person.name, person.daily_hours, position as i64],
            )?;
        }
        Self::write_jobs(&tx, &jobs)?;

        for (member, calendar) in &snapshot.calendars {
            tx.execute(
                "INSERT INTO calendars (member, start_date, working_weekdays) VALUES (?1, ?2, ?3)",
                params![
                    member,
                    format_date(calendar.start_date),
                    format_weekdays(calendar.working_weekdays)
                ],
            )?;
            for date in &calendar.non_working_dates {
                tx.execute(
                    "INSERT INTO non_working_dates (member, date) VALUES (?1, ?2)",
                    params![member, format_date(*date)],
                )?;
            }
            for (date, hours) in &calendar.unavailable_hours {
                tx.execute(
                    "INSERT INTO unavailable_hours (member, date, source, hours)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![member, format_date(*date), MANUAL_SOURCE, hours],
                )?;
            }
        }
        tx.commit()?;
        tracing::info!(
            members = snapshot.team.len(),
            jobs = jobs.len(),
            "imported state snapshot"
        );
        Ok(())
    }
}
