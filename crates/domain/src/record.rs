// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Procurement records ("contrataciones").
//!
//! A record's schedule is computed once, when the record is created,
//! and stored verbatim. Records are soft-deleted, never removed.

use crate::error::DomainError;
use crate::schedule::Schedule;
use crate::types::SoftDelete;
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

/// A non-negative monetary amount, held in cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u64);

impl Amount {
    /// Creates an amount from a number of cents.
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        if trimmed.starts_with('-') {
            return Err(DomainError::InvalidAmount(format!(
                "'{s}' is negative"
            )));
        }

        let (whole, fraction): (&str, &str) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(DomainError::InvalidAmount(format!(
                "'{s}' is not a decimal number"
            )));
        }
        if fraction.len() > 2 {
            return Err(DomainError::InvalidAmount(format!(
                "'{s}' has more than two decimal places"
            )));
        }

        let overflow = || DomainError::InvalidAmount(format!("'{s}' is too large"));
        let units: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| overflow())? * 10,
            _ => fraction.parse().map_err(|_| overflow())?,
        };

        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .map(Self)
            .ok_or_else(overflow)
    }
}

impl TryFrom<String> for Amount {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// A procurement process and its computed milestone schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcurementRecord {
    /// The record's identifier.
    pub id: i64,
    /// The procurement title.
    pub title: String,
    /// The date the process starts. Stage offsets count from the next day.
    #[serde(with = "crate::calendar::ymd")]
    pub start_date: Date,
    /// When the record was generated.
    #[serde(serialize_with = "serialize_rfc3339")]
    pub generated_at: OffsetDateTime,
    /// The contract amount.
    pub amount: Amount,
    /// The owning modality.
    pub modality_id: i64,
    /// The modality name at creation time.
    pub modality_name: String,
    /// The user who created the record.
    pub created_by: String,
    /// Stage name to completion date, computed at creation.
    pub schedule: Schedule,
    /// Soft-delete flag.
    pub deleted: bool,
}

impl SoftDelete for ProcurementRecord {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl ProcurementRecord {
    /// Returns whether `term` appears in the title or modality name, ignoring case.
    ///
    /// An empty or whitespace-only term matches every record.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let needle: String = term.trim().to_lowercase();
        needle.is_empty()
            || self.title.to_lowercase().contains(&needle)
            || self.modality_name.to_lowercase().contains(&needle)
    }
}

fn serialize_rfc3339<S>(instant: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted: String = instant
        .format(&Rfc3339)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}
