//! The in-memory roster: a capped, append-only list with unique names.

use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::date_math::{LeapDayPolicy, days_until, next_occurrence};
use crate::error::ErrorCode;
use crate::model::{BirthdayRecord, ListFilter, name_key};
use crate::view::Upcoming;

/// Default roster capacity.
pub const DEFAULT_MAX_RECORDS: usize = 60;

/// Input format accepted by [`Roster::add`].
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Reasons an add is refused. The `Display` text is shown to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("{0}")]
    Validation(String),

    #[error("Maximum of {limit} birthdays reached.")]
    Capacity { limit: usize },

    #[error("This name already exists.")]
    DuplicateName { name: String },
}

impl RosterError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::InvalidInput,
            Self::Capacity { .. } => ErrorCode::RosterFull,
            Self::DuplicateName { .. } => ErrorCode::DuplicateName,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Roster {
    records: Vec<BirthdayRecord>,
    max_records: usize,
    leap_policy: LeapDayPolicy,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECORDS, LeapDayPolicy::default())
    }
}

impl Roster {
    #[must_use]
    pub const fn new(max_records: usize, leap_policy: LeapDayPolicy) -> Self {
        Self {
            records: Vec::new(),
            max_records,
            leap_policy,
        }
    }

    /// Build a roster from previously stored records.
    ///
    /// Stored data may predate the current limits or have been edited by
    /// hand, so the invariants are re-established here: later
    /// case-insensitive duplicates are dropped, then anything past
    /// `max_records`.
    #[must_use]
    pub fn with_records(
        records: Vec<BirthdayRecord>,
        max_records: usize,
        leap_policy: LeapDayPolicy,
    ) -> Self {
        let mut roster = Self::new(max_records, leap_policy);
        let mut seen = HashSet::new();
        for record in records {
            if !seen.insert(record.name_key()) {
                warn!(name = %record.name, "dropping stored record with duplicate name");
                continue;
            }
            if roster.is_full() {
                warn!(
                    name = %record.name,
                    limit = max_records,
                    "dropping stored record beyond roster capacity"
                );
                continue;
            }
            roster.records.push(record);
        }
        roster
    }

    #[must_use]
    pub fn records(&self) -> &[BirthdayRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.max_records
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.max_records
    }

    /// Append a record from raw user input.
    ///
    /// `name` is trimmed; `date` must be `YYYY-MM-DD`. Checks run in order:
    /// required fields, date format, capacity, duplicate name. A refused add
    /// leaves the roster untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Validation`] for empty or malformed input,
    /// [`RosterError::Capacity`] when full, and [`RosterError::DuplicateName`]
    /// on a case-insensitive name collision.
    pub fn add(&mut self, name: &str, date: &str) -> Result<&BirthdayRecord, RosterError> {
        let name = name.trim();
        let date = date.trim();
        if name.is_empty() || date.is_empty() {
            return Err(RosterError::Validation(
                "Please fill all fields.".to_string(),
            ));
        }
        let parsed = NaiveDate::parse_from_str(date, DATE_INPUT_FORMAT).map_err(|_| {
            RosterError::Validation(format!("Invalid date '{date}': expected YYYY-MM-DD."))
        })?;
        self.add_date(name, parsed)
    }

    /// Append a record whose date is already parsed.
    ///
    /// # Errors
    ///
    /// Same as [`Roster::add`], minus date parsing.
    pub fn add_date(&mut self, name: &str, date: NaiveDate) -> Result<&BirthdayRecord, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::Validation(
                "Please fill all fields.".to_string(),
            ));
        }
        if self.is_full() {
            return Err(RosterError::Capacity {
                limit: self.max_records,
            });
        }
        let key = name_key(name);
        if self.records.iter().any(|r| r.name_key() == key) {
            return Err(RosterError::DuplicateName {
                name: name.to_string(),
            });
        }

        debug!(name, %date, "adding birthday");
        let index = self.records.len();
        self.records.push(BirthdayRecord::new(name, date));
        Ok(&self.records[index])
    }

    /// Grid view: records matching `filter` in calendar (month, day) order.
    ///
    /// Records sharing a month/day keep their roster order.
    #[must_use]
    pub fn list(&self, filter: &ListFilter) -> Vec<&BirthdayRecord> {
        let mut matched: Vec<&BirthdayRecord> =
            self.records.iter().filter(|r| filter.matches(r)).collect();
        matched.sort_by_key(|r| r.month_day());
        matched
    }

    /// Proximity view: the `n` soonest occurrences relative to `reference`.
    ///
    /// Ties on `days_until` are broken by calendar (month, day), then roster
    /// order. Distinct month/days only tie when a leap day shares its
    /// fallback date in a common year.
    #[must_use]
    pub fn next_upcoming(&self, n: usize, reference: NaiveDate) -> Vec<Upcoming> {
        let mut rows: Vec<Upcoming> = self
            .records
            .iter()
            .map(|record| self.upcoming_for(record, reference))
            .collect();
        rows.sort_by_key(|row| (row.days_until, row.record.month_day()));
        rows.truncate(n);
        rows
    }

    /// The single soonest occurrence, if any.
    #[must_use]
    pub fn single_next(&self, reference: NaiveDate) -> Option<Upcoming> {
        self.next_upcoming(1, reference).into_iter().next()
    }

    fn upcoming_for(&self, record: &BirthdayRecord, reference: NaiveDate) -> Upcoming {
        let month_day = record.month_day();
        Upcoming {
            record: record.clone(),
            next_occurrence: next_occurrence(month_day, reference, self.leap_policy),
            days_until: days_until(month_day, reference, self.leap_policy),
        }
    }
}
