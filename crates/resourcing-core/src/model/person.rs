//! Team members and their nominal daily capacity.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ValidationError;

/// Smallest accepted nominal working day, in hours.
pub const MIN_DAILY_HOURS: f64 = 1.0;

/// A person who can be assigned jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique key
    pub name: String,
    /// Hours in a full working day
    pub daily_hours: f64,
}

impl Person {
    pub fn new(name: impl Into<String>, daily_hours: f64) -> Self {
        Self {
            name: name.into(),
            daily_hours,
        }
    }

    /// # Errors
    /// Returns a [`ValidationError`] for an empty name or daily hours that
    /// are not finite or below [`MIN_DAILY_HOURS`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if !self.daily_hours.is_finite() || self.daily_hours < MIN_DAILY_HOURS {
            return Err(ValidationError::InvalidValue {
                field: "daily_hours".into(),
                message: format!(
                    "expected a finite value >= {MIN_DAILY_HOURS}, got {}",
                    self.daily_hours
                ),
            });
        }
        Ok(())
    }
}

/// Team used when nothing valid is stored.
pub fn default_team() -> Vec<Person> {
    ["SL", "LS", "LB"]
        .into_iter()
        .map(|name| Person::new(name, 8.0))
        .collect()
}

/// Drop invalid and duplicate members (first occurrence wins).
///
/// Falls back to [`default_team`] when nothing valid remains.
pub fn clean_team(team: impl IntoIterator<Item = Person>) -> Vec<Person> {
    let mut seen = HashSet::new();
    let cleaned: Vec<Person> = team
        .into_iter()
        .filter(|p| match p.validate() {
            Ok(()) => seen.insert(p.name.clone()),
            Err(e) => {
                tracing::warn!(member = %p.name, "dropping team member: {e}");
                false
            }
        })
        .collect();

    if cleaned.is_empty() {
        default_team()
    } else {
        cleaned
    }
}
