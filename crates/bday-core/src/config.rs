use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::date_math::LeapDayPolicy;
use crate::roster::DEFAULT_MAX_RECORDS;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "BDAY_CONFIG";

/// Environment variable overriding the store location.
pub const STORE_ENV: &str = "BDAY_STORE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    #[serde(default = "default_upcoming")]
    pub upcoming: usize,
    #[serde(default)]
    pub leap_day: LeapDayPolicy,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
            upcoming: default_upcoming(),
            leap_day: LeapDayPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl StorageConfig {
    #[must_use]
    pub const fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

/// Location of the config file: `$BDAY_CONFIG`, else `<config_dir>/bday/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("bday/config.toml"))
}

/// Load the config from its default location; defaults when absent.
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// `<data_dir>/bday/birthdays.json`, or `.bday/birthdays.json` when the
/// platform has no data directory.
#[must_use]
pub fn default_store_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(".bday/birthdays.json"),
        |dir| dir.join("bday/birthdays.json"),
    )
}

/// Pick the store path. Precedence: CLI flag, `BDAY_STORE`, config, default.
#[must_use]
pub fn resolve_store_path(
    cli_path: Option<PathBuf>,
    env_path: Option<PathBuf>,
    storage: &StorageConfig,
) -> PathBuf {
    cli_path
        .or(env_path)
        .or_else(|| storage.path.clone())
        .unwrap_or_else(default_store_path)
}

const fn default_max_records() -> usize {
    DEFAULT_MAX_RECORDS
}

const fn default_upcoming() -> usize {
    3
}

const fn default_lock_timeout_ms() -> u64 {
    2_000
}
