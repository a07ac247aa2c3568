// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Milestone schedule derivation.
//!
//! A schedule maps each stage of a procurement modality to the calendar
//! date on which it completes, given a start date and each stage's offset
//! in business days.
//!
//! ## Invariants
//!
//! - One entry per distinct stage name
//! - Entries keep the order in which stage names first appear in the input
//! - A repeated stage name takes the date of its last occurrence
//! - Dates persist as midnight UTC of the computed calendar date

use crate::calendar::{HolidayCalendar, add_business_days};
use crate::error::DomainError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing::debug;

/// A non-negative stage offset, in business days.
///
/// Modality-stage links store this as text; `FromStr` reads that form.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct BusinessDays(u32);

impl BusinessDays {
    /// Creates an offset of `days` business days.
    #[must_use]
    pub const fn new(days: u32) -> Self {
        Self(days)
    }

    /// Returns the number of business days.
    #[must_use]
    pub const fn days(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for BusinessDays {
    type Error = DomainError;

    fn try_from(days: i64) -> Result<Self, Self::Error> {
        if days < 0 {
            return Err(DomainError::NegativeDuration { stage: None, days });
        }
        u32::try_from(days)
            .map(Self)
            .map_err(|_| DomainError::InvalidDuration(days.to_string()))
    }
}

impl From<BusinessDays> for i64 {
    fn from(days: BusinessDays) -> Self {
        Self::from(days.0)
    }
}

impl FromStr for BusinessDays {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        // Empty text is stored for links created without an explicit duration
        if trimmed.is_empty() {
            return Ok(Self(0));
        }
        let days: i64 = trimmed
            .parse()
            .map_err(|_| DomainError::InvalidDuration(s.to_string()))?;
        Self::try_from(days)
    }
}

impl std::fmt::Display for BusinessDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stage name paired with its offset from the start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDuration {
    /// The stage name.
    pub stage: String,
    /// Offset in business days. Negative values are rejected by `compute_schedule`.
    pub days: i64,
}

impl StageDuration {
    /// Creates a new `StageDuration`.
    #[must_use]
    pub fn new(stage: &str, days: i64) -> Self {
        Self {
            stage: stage.to_string(),
            days,
        }
    }
}

/// A stage and its computed completion date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledStage {
    /// The stage name.
    pub stage: String,
    /// The computed calendar date.
    pub date: Date,
}

impl ScheduledStage {
    /// The persisted instant: midnight UTC of the computed date.
    #[must_use]
    pub const fn instant(&self) -> OffsetDateTime {
        self.date.midnight().assume_utc()
    }

    /// The persisted instant formatted as RFC 3339, e.g. `2025-01-06T00:00:00Z`.
    ///
    /// # Errors
    ///
    /// Returns an error if the instant cannot be formatted.
    pub fn instant_rfc3339(&self) -> Result<String, DomainError> {
        self.instant()
            .format(&Rfc3339)
            .map_err(|e| DomainError::DateFormatError {
                error: e.to_string(),
            })
    }
}

/// The computed mapping from stage name to completion date for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<ScheduledStage>,
}

impl Schedule {
    /// Creates an empty schedule.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets the date for `stage`, replacing any earlier date in place.
    pub fn insert(&mut self, stage: &str, date: Date) {
        if let Some(existing) = self.entries.iter_mut().find(|entry| entry.stage == stage) {
            existing.date = date;
        } else {
            self.entries.push(ScheduledStage {
                stage: stage.to_string(),
                date,
            });
        }
    }

    /// Returns the date computed for `stage`.
    #[must_use]
    pub fn get(&self, stage: &str) -> Option<Date> {
        self.entries
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.date)
    }

    /// Number of scheduled stages.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no stage is scheduled.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the scheduled stages in schedule order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScheduledStage> {
        self.entries.iter()
    }

    /// The latest completion date, if any stage is scheduled.
    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.entries.iter().map(|entry| entry.date).max()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a ScheduledStage;
    type IntoIter = std::slice::Iter<'a, ScheduledStage>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Serializes as a JSON object of stage name to RFC 3339 instant.
impl Serialize for Schedule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            let instant: String = entry
                .instant_rfc3339()
                .map_err(serde::ser::Error::custom)?;
            map.serialize_entry(&entry.stage, &instant)?;
        }
        map.end()
    }
}

/// Computes the completion date of every stage.
///
/// Each stage's date is `add_business_days(start, days, holidays)`.
///
/// # Arguments
///
/// * `start` - The start date of the procurement process
/// * `durations` - Stage offsets, processed in slice order
/// * `holidays` - The holidays to skip in addition to weekends
///
/// # Returns
///
/// A `Schedule` with one entry per distinct stage name. When a name
/// repeats, the entry stays where the name first appeared and takes the
/// date of the last occurrence.
///
/// # Errors
///
/// Returns an error if:
/// - Any duration is negative (nothing is computed)
/// - Date arithmetic overflows
pub fn compute_schedule(
    start: Date,
    durations: &[StageDuration],
    holidays: &HolidayCalendar,
) -> Result<Schedule, DomainError> {
    // Reject the whole input before computing anything
    if let Some(negative) = durations.iter().find(|d| d.days < 0) {
        return Err(DomainError::NegativeDuration {
            stage: Some(negative.stage.clone()),
            days: negative.days,
        });
    }

    let mut schedule: Schedule = Schedule::new();
    for duration in durations {
        let date: Date = add_business_days(start, duration.days, holidays)?;
        debug!(
            stage = %duration.stage,
            days = duration.days,
            %start,
            %date,
            "Scheduled stage"
        );
        schedule.insert(&duration.stage, date);
    }

    Ok(schedule)
}
