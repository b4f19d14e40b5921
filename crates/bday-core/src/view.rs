//! Derived, per-render values: proximity rows and the strings the shell shows.

use chrono::NaiveDate;
use serde::Serialize;

use crate::date_math::format_display_date;
use crate::model::BirthdayRecord;

/// A record paired with its next occurrence relative to some reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upcoming {
    #[serde(flatten)]
    pub record: BirthdayRecord,
    pub next_occurrence: NaiveDate,
    pub days_until: u32,
}

impl Upcoming {
    #[must_use]
    pub fn display_date(&self) -> String {
        format_display_date(self.record.date)
    }

    #[must_use]
    pub fn is_today(&self) -> bool {
        self.days_until == 0
    }
}

/// `1 day`, `0 days`, `12 days`.
#[must_use]
pub fn days_label(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// Text for the "next birthday" banner.
#[must_use]
pub fn banner_text(next: Option<&Upcoming>) -> String {
    match next {
        Some(up) => format!(
            "{} — {} ({} left)",
            up.record.name,
            up.display_date(),
            days_label(up.days_until)
        ),
        None => "No birthdays added yet.".to_string(),
    }
}

/// Storage indicator, e.g. `6/60 stored`.
#[must_use]
pub fn stored_counter(len: usize, max: usize) -> String {
    format!("{len}/{max} stored")
}
