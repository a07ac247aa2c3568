// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Business-day calendar.
//!
//! A business day is a calendar day that is not a Saturday, not a Sunday,
//! and not a registered holiday.
//!
//! ## Invariants
//!
//! - All arithmetic operates on timezone-naive calendar dates (`time::Date`)
//! - Holidays are compared by calendar date only
//! - The calendar owns no global state; callers pass the holiday set explicitly
//! - The start date is never counted: the clock starts the day after it

use crate::error::DomainError;
use crate::types::Holiday;
use std::collections::BTreeSet;
use time::{Date, Weekday};

/// The set of non-business dates beyond weekends.
///
/// Year scoping is the caller's policy; any set of dates is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: BTreeSet<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar with no holidays.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            dates: BTreeSet::new(),
        }
    }

    /// Builds a calendar from the non-deleted holidays in `holidays`.
    #[must_use]
    pub fn from_holidays<'a, I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = &'a Holiday>,
    {
        holidays
            .into_iter()
            .filter(|holiday| !holiday.deleted)
            .map(|holiday| holiday.date)
            .collect()
    }

    /// Returns whether `date` is a registered holiday.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.dates.contains(&date)
    }

    /// Number of distinct holiday dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true when no holidays are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterates the holiday dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Date> + '_ {
        self.dates.iter().copied()
    }
}

impl FromIterator<Date> for HolidayCalendar {
    fn from_iter<T: IntoIterator<Item = Date>>(iter: T) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

/// Returns whether `date` is a business day.
///
/// A date is not a business day when it falls on a Saturday or Sunday,
/// or when it matches one of the holidays.
#[must_use]
pub fn is_business_day(date: Date, holidays: &HolidayCalendar) -> bool {
    !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday) && !holidays.contains(date)
}

/// Projects `business_days` business days forward from `start`.
///
/// # Algorithm
///
/// 1. The cursor starts on the day after `start` and advances one day at a
///    time until it lands on a business day.
/// 2. That first business day is business day number 1.
/// 3. The cursor keeps advancing one calendar day at a time; every business
///    day it lands on increments the count.
/// 4. The date on which the count first equals `business_days` is returned.
///
/// With `business_days == 0` the result is the first business day strictly
/// after `start`, the same date an offset of 1 produces. It never means
/// "same day".
///
/// # Example
///
/// ```text
/// start = 2025-01-03 (Friday), no holidays
///
/// 2025-01-04 Saturday   skipped
/// 2025-01-05 Sunday     skipped
/// 2025-01-06 Monday     day 1   <- offsets 0 and 1
/// 2025-01-07 Tuesday    day 2   <- offset 2
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - `business_days` is negative
/// - The cursor runs past the last representable date
pub fn add_business_days(
    start: Date,
    business_days: i64,
    holidays: &HolidayCalendar,
) -> Result<Date, DomainError> {
    if business_days < 0 {
        return Err(DomainError::NegativeDuration {
            stage: None,
            days: business_days,
        });
    }

    let mut current: Date = next_day(start)?;

    // Seek the first business day after start
    while !is_business_day(current, holidays) {
        current = next_day(current)?;
    }

    let mut counted: i64 = 0;
    while counted < business_days {
        if is_business_day(current, holidays) {
            counted += 1;
            if counted < business_days {
                current = next_day(current)?;
            }
        } else {
            current = next_day(current)?;
        }
    }

    Ok(current)
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
/// Invalid dates are never repaired (e.g. `2025-02-30` is rejected).
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(
        value.trim(),
        time::macros::format_description!("[year]-[month]-[day]"),
    )
    .map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

fn next_day(date: Date) -> Result<Date, DomainError> {
    date.next_day()
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("advancing past {date}"),
        })
}

/// Serde adapter for `YYYY-MM-DD` dates.
pub mod ymd {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    /// Serializes a date as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be formatted.
    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted: String = date
            .format(time::macros::format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    /// Deserializes a `YYYY-MM-DD` date.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid calendar date.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: String = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}
