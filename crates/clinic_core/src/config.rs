//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Resolve database location and logging settings from the environment.
//! - Provide platform defaults under the user's local data directory.
//!
//! # Invariants
//! - Resolution never panics; unusable values surface as `ConfigError`.
//! - Empty environment values behave as unset.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "clinic";
pub const DB_FILE_NAME: &str = "clinic.sqlite3";

pub const DB_PATH_ENV: &str = "CLINIC_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "CLINIC_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CLINIC_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No platform data directory and no explicit override.
    NoDataDir,
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "cannot determine a local data directory; set {DB_PATH_ENV} and {LOG_DIR_ENV}"
            ),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "{LOG_DIR_ENV} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicConfig {
    pub database_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: PathBuf,
}

impl ClinicConfig {
    /// Reads `CLINIC_DB_PATH`, `CLINIC_LOG_LEVEL` and `CLINIC_LOG_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(level) => normalize_level(&level)
                .map_err(|err| ConfigError::InvalidLogLevel(err.to_string()))?,
            None => default_log_level(),
        };

        let database_path = match read(DB_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => app_data_dir()?.join(DB_FILE_NAME),
        };

        let log_dir = match read(LOG_DIR_ENV) {
            Some(path) => PathBuf::from(path),
            None => app_data_dir()?.join("logs"),
        };
        if !log_dir.is_absolute() {
            return Err(ConfigError::RelativeLogDir(log_dir));
        }

        Ok(Self {
            database_path,
            log_level,
            log_dir,
        })
    }
}

/// Per-user application data directory.
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(ConfigError::NoDataDir)
}
