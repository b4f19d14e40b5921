//! Next-occurrence arithmetic for annual dates.
//!
//! Everything here works on plain calendar dates ([`NaiveDate`]); there is no
//! time-of-day component, so "days until" is an exact whole-day difference and
//! never needs rounding.
//!
//! # Leap days
//!
//! A February 29 birthday has no exact occurrence in a common year. The
//! resolution is an explicit [`LeapDayPolicy`] instead of whatever a date
//! library happens to do on overflow. The default rolls to March 1.

use chrono::{Datelike, Local, Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::MonthDay;

/// How a February 29 occurrence resolves in a common year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapDayPolicy {
    /// Celebrate on March 1.
    #[default]
    RollToMarch1,
    /// Celebrate on February 28.
    ClampToFeb28,
}

impl LeapDayPolicy {
    const fn fallback(self) -> (u32, u32) {
        match self {
            Self::RollToMarch1 => (3, 1),
            Self::ClampToFeb28 => (2, 28),
        }
    }
}

/// The concrete date `month_day` lands on in `year`.
///
/// Saturates at [`NaiveDate::MAX`] for years outside chrono's range.
#[must_use]
pub fn occurrence_in_year(month_day: MonthDay, year: i32, policy: LeapDayPolicy) -> NaiveDate {
    if let Some(date) = NaiveDate::from_ymd_opt(year, month_day.month(), month_day.day()) {
        return date;
    }
    let (month, day) = policy.fallback();
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MAX)
}

/// Next date on or after `reference` on which `month_day` occurs.
///
/// The result is never earlier than `reference` and at most 366 days later.
#[must_use]
pub fn next_occurrence(
    month_day: MonthDay,
    reference: NaiveDate,
    policy: LeapDayPolicy,
) -> NaiveDate {
    let candidate = occurrence_in_year(month_day, reference.year(), policy);
    if candidate < reference {
        occurrence_in_year(month_day, reference.year().saturating_add(1), policy)
    } else {
        candidate
    }
}

/// Whole days from `reference` to the next occurrence of `month_day`.
///
/// Zero means the occurrence is `reference` itself.
#[must_use]
pub fn days_until(month_day: MonthDay, reference: NaiveDate, policy: LeapDayPolicy) -> u32 {
    let next = next_occurrence(month_day, reference, policy);
    let days = (next - reference).num_days();
    u32::try_from(days).unwrap_or_default()
}

/// English ordinal suffix for a day of the month.
#[must_use]
pub const fn ordinal_suffix(day: u32) -> &'static str {
    if matches!(day % 100, 11..=13) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// English name of a 1-based month, or `None` outside 1..=12.
#[must_use]
pub fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

/// Display form used on cards and banners, e.g. `9th November`.
///
/// Month names come from a fixed English table, independent of the system
/// locale.
#[must_use]
pub fn format_display_date(date: NaiveDate) -> String {
    let day = date.day();
    let month = month_name(date.month()).unwrap_or_default();
    format!("{day}{} {month}", ordinal_suffix(day))
}

/// Today's date on the local calendar.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
