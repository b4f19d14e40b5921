//! bday-core library.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at module boundaries; `anyhow::Result`
//!   only for config loading.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`). The library
//!   never installs a subscriber.
//! - **Dates**: `chrono::NaiveDate` throughout; no time zones.

pub mod config;
pub mod date_math;
pub mod error;
pub mod lock;
pub mod model;
pub mod roster;
pub mod seed;
pub mod session;
pub mod store;
pub mod view;

pub use date_math::LeapDayPolicy;
pub use model::{BirthdayRecord, ListFilter, MonthDay, MonthFilter};
pub use roster::{Roster, RosterError};
pub use session::Session;
pub use store::{JsonFileStore, MemoryStore, PersistenceGateway};
pub use view::Upcoming;
