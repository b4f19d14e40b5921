use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One person and their birth date.
///
/// Only the month and day of `date` drive recurrence math. The year is kept
/// as provenance (a real birth year or a placeholder) and never consulted
/// when computing the next occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRecord {
    pub name: String,
    pub date: NaiveDate,
}

impl BirthdayRecord {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }

    /// The recurring part of the date.
    #[must_use]
    pub fn month_day(&self) -> MonthDay {
        MonthDay::from_date(self.date)
    }

    /// Key used for case-insensitive uniqueness checks.
    #[must_use]
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

pub(crate) fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// A (month, day) pair with calendar ordering.
///
/// Field order matters: the derived `Ord` compares month first, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Build a month/day pair, rejecting combinations that never occur.
    ///
    /// February 29 is accepted.
    #[must_use]
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year, so Feb 29 validates.
        NaiveDate::from_ymd_opt(2000, month, day).map(Self::from_date)
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Month, 1-based.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    #[must_use]
    pub const fn day(self) -> u32 {
        self.day
    }

    #[must_use]
    pub const fn is_leap_day(self) -> bool {
        self.month == 2 && self.day == 29
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Month predicate for the grid view.
///
/// Months are zero-based (`0` = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

impl MonthFilter {
    #[must_use]
    pub fn matches(self, record: &BirthdayRecord) -> bool {
        match self {
            Self::All => true,
            Self::Month(zero_based) => record.date.month0() == zero_based,
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Month(m) => write!(f, "{m}"),
        }
    }
}

/// Error returned when a month filter string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid month filter '{raw}': expected 'all', 0-11, or a month name")]
pub struct ParseMonthFilterError {
    pub raw: String,
}

impl FromStr for MonthFilter {
    type Err = ParseMonthFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        if let Ok(n) = trimmed.parse::<u32>() {
            return if n < 12 {
                Ok(Self::Month(n))
            } else {
                Err(ParseMonthFilterError { raw: s.to_string() })
            };
        }
        trimmed
            .parse::<Month>()
            .map(|month| Self::Month(month.number_from_month() - 1))
            .map_err(|_| ParseMonthFilterError { raw: s.to_string() })
    }
}

/// Combined name + month filter used by [`crate::roster::Roster::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring; empty matches everything.
    pub name: String,
    pub month: MonthFilter,
}

impl ListFilter {
    pub fn new(name: impl Into<String>, month: MonthFilter) -> Self {
        Self {
            name: name.into(),
            month,
        }
    }

    #[must_use]
    pub fn matches(&self, record: &BirthdayRecord) -> bool {
        let needle = name_key(self.name.trim());
        let name_ok = needle.is_empty() || record.name_key().contains(&needle);
        name_ok && self.month.matches(record)
    }
}
