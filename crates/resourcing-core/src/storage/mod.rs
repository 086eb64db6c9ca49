mod config;
pub mod migrations;
pub mod plan_db;
pub mod snapshot;

pub use config::{Config, DefaultsConfig, PlanningConfig};
pub use plan_db::{PlanDb, UnavailableEntry, MANUAL_SOURCE};
pub use snapshot::StateSnapshot;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/resourcing[-dev]/` based on RESOURCING_ENV.
///
/// Set RESOURCING_ENV=dev to use the development data directory, or
/// RESOURCING_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("RESOURCING_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("RESOURCING_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("resourcing-dev")
            } else {
                base_dir.join("resourcing")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
