//! Per-invocation state shared by the roster commands.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use bday_core::config::{self, Config, STORE_ENV};
use bday_core::date_math;
use bday_core::store::JsonFileStore;
use bday_core::{Roster, Session};
use chrono::NaiveDate;
use tracing::debug;

use crate::output::OutputMode;

pub struct AppContext {
    pub config: Config,
    pub session: Session<JsonFileStore>,
    /// Reference date for every proximity computation in this run.
    pub today: NaiveDate,
    pub output: OutputMode,
    pub quiet: bool,
}

impl AppContext {
    /// Open the roster store named by flags, environment, or config.
    pub fn open(
        config: Config,
        store_flag: Option<PathBuf>,
        today_flag: Option<NaiveDate>,
        output: OutputMode,
        quiet: bool,
    ) -> Result<Self> {
        let env_store = std::env::var_os(STORE_ENV).map(PathBuf::from);
        let path = config::resolve_store_path(store_flag, env_store, &config.storage);
        debug!(path = %path.display(), "opening roster store");

        let store = JsonFileStore::new(&path).with_lock_timeout(config.storage.lock_timeout());
        let session = Session::open(
            store,
            config.roster.max_records,
            config.roster.leap_day,
        )
        .with_context(|| format!("failed to open roster at {}", path.display()))?;

        Ok(Self {
            config,
            session,
            today: today_flag.unwrap_or_else(date_math::today),
            output,
            quiet,
        })
    }

    pub const fn roster(&self) -> &Roster {
        self.session.roster()
    }

    pub fn store_path(&self) -> &Path {
        self.session.gateway().path()
    }
}
