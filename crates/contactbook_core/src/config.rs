//! Process configuration for contact book hosts.
//!
//! # Responsibility
//! - Resolve database path, logging settings and the group delete policy
//!   from environment-style key lookups.
//!
//! # Invariants
//! - Resolution is pure given the lookup function; nothing global is read
//!   except through `from_env`.

use crate::logging::{default_log_level, normalize_level};
use crate::repo::group_repo::GroupDeletePolicy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "CONTACTBOOK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CONTACTBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CONTACTBOOK_LOG_DIR";
pub const ENV_GROUP_DELETE: &str = "CONTACTBOOK_GROUP_DELETE";

const DEFAULT_DB_FILE_NAME: &str = "contactbook.sqlite3";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid value `{}` for {}; expected {}",
            self.value, self.key, self.expected
        )
    }
}

impl Error for ConfigError {}

/// Resolved settings handed to the storage and logging bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub group_delete_policy: GroupDeletePolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            group_delete_policy: GroupDeletePolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Reads `CONTACTBOOK_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|_| ConfigError {
                key: ENV_LOG_LEVEL,
                value: level.clone(),
                expected: "trace|debug|info|warn|error",
            })?;
        }

        if let Some(dir) = read(ENV_LOG_DIR) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError {
                    key: ENV_LOG_DIR,
                    value: dir.display().to_string(),
                    expected: "an absolute directory path",
                });
            }
            config.log_dir = Some(dir);
        }

        if let Some(policy) = read(ENV_GROUP_DELETE) {
            config.group_delete_policy =
                GroupDeletePolicy::parse(&policy).ok_or_else(|| ConfigError {
                    key: ENV_GROUP_DELETE,
                    value: policy.clone(),
                    expected: "block|cascade|unguarded",
                })?;
        }

        Ok(config)
    }
}
