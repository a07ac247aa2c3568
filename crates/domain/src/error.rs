// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and schedule computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A business-day offset was negative.
    NegativeDuration {
        /// The stage the offset belongs to, when known.
        stage: Option<String>,
        /// The rejected offset.
        days: i64,
    },
    /// A business-day offset could not be read as a whole number.
    InvalidDuration(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to format a date or instant.
    DateFormatError {
        /// The formatting error message.
        error: String,
    },
    /// A name (stage, modality, holiday or record title) is empty.
    InvalidName {
        /// What the name belongs to.
        kind: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// A monetary amount is malformed or negative.
    InvalidAmount(String),
    /// The timezone identifier is not a known IANA zone.
    InvalidTimezone(String),
    /// A holiday already exists on that date.
    DuplicateHoliday {
        /// The date already taken.
        date: time::Date,
    },
    /// A stage with the same name (ignoring case) already exists.
    DuplicateStage(String),
    /// A modality with the same name (ignoring case) already exists.
    DuplicateModality(String),
    /// The modality already has an active link to the stage.
    DuplicateModalityStage {
        /// The modality identifier.
        modality_id: i64,
        /// The stage identifier.
        stage_id: i64,
    },
    /// Holiday does not exist or was deleted.
    HolidayNotFound(i64),
    /// Stage does not exist or was deleted.
    StageNotFound(i64),
    /// Modality does not exist or was deleted.
    ModalityNotFound(i64),
    /// Modality-stage link does not exist or was deleted.
    ModalityStageNotFound(i64),
    /// Procurement record does not exist or was deleted.
    RecordNotFound(i64),
    /// An update named no field to change.
    EmptyUpdate {
        /// What was being updated.
        kind: &'static str,
        /// The entity identifier.
        id: i64,
    },
    /// Page number or page size is zero.
    InvalidPagination {
        /// The requested page.
        page: u32,
        /// The requested page size.
        limit: u32,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeDuration {
                stage: Some(stage),
                days,
            } => {
                write!(
                    f,
                    "Stage '{stage}' has a negative duration of {days} business days"
                )
            }
            Self::NegativeDuration { stage: None, days } => {
                write!(f, "Duration must not be negative, got {days} business days")
            }
            Self::InvalidDuration(value) => {
                write!(f, "Invalid duration '{value}': expected a whole number of business days")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateFormatError { error } => write!(f, "Failed to format date: {error}"),
            Self::InvalidName { kind, reason } => write!(f, "Invalid {kind} name: {reason}"),
            Self::InvalidAmount(msg) => write!(f, "Invalid amount: {msg}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::DuplicateHoliday { date } => {
                write!(f, "A holiday already exists on {date}")
            }
            Self::DuplicateStage(name) => write!(f, "Stage '{name}' already exists"),
            Self::DuplicateModality(name) => write!(f, "Modality '{name}' already exists"),
            Self::DuplicateModalityStage {
                modality_id,
                stage_id,
            } => {
                write!(
                    f,
                    "Modality {modality_id} already has an active link to stage {stage_id}"
                )
            }
            Self::HolidayNotFound(id) => write!(f, "Holiday {id} not found"),
            Self::StageNotFound(id) => write!(f, "Stage {id} not found"),
            Self::ModalityNotFound(id) => write!(f, "Modality {id} not found"),
            Self::ModalityStageNotFound(id) => write!(f, "Modality-stage link {id} not found"),
            Self::RecordNotFound(id) => write!(f, "Procurement record {id} not found"),
            Self::EmptyUpdate { kind, id } => {
                write!(f, "No fields to update for {kind} {id}")
            }
            Self::InvalidPagination { page, limit } => {
                write!(
                    f,
                    "Invalid pagination: page {page} with limit {limit}. Both must be greater than 0"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
