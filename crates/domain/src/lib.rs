// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod calendar;
mod error;
mod record;
mod schedule;
mod summary;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use calendar::{HolidayCalendar, add_business_days, is_business_day, parse_date, ymd};
pub use error::DomainError;
pub use record::{Amount, ProcurementRecord};
pub use schedule::{BusinessDays, Schedule, ScheduledStage, StageDuration, compute_schedule};
pub use summary::{format_date, format_record_summary, format_timestamp, parse_timezone};
pub use types::{Holiday, Modality, ModalityStage, SoftDelete, Stage};
pub use validation::{
    validate_holiday_date_unique, validate_link_unique, validate_modality_name_unique,
    validate_name, validate_stage_name_unique,
};

// Re-exported so callers need not depend on chrono-tz directly
pub use chrono_tz::Tz;
