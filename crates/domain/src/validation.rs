// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Holiday, Modality, ModalityStage, SoftDelete, Stage};
use time::Date;

/// Validates that a name is not empty once trimmed.
///
/// # Arguments
///
/// * `kind` - What the name belongs to (e.g. "stage"), used in the error
/// * `name` - The name to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is empty or whitespace.
pub fn validate_name(kind: &'static str, name: &str) -> Result<(), DomainError> {
    // Rule: name must not be empty
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName {
            kind,
            reason: String::from("Name cannot be empty"),
        });
    }
    Ok(())
}

/// Compares two names the way uniqueness is enforced: trimmed, ignoring case.
fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Validates that a stage name is unique among active stages.
///
/// This function is pure, deterministic, and has no side effects.
///
/// # Arguments
///
/// * `name` - The proposed name
/// * `existing` - All known stages, deleted ones included
/// * `exclude_id` - The stage being renamed, which may keep its own name
///
/// # Errors
///
/// Returns `DomainError::DuplicateStage` if another active stage has the same
/// name ignoring case and surrounding whitespace.
pub fn validate_stage_name_unique(
    name: &str,
    existing: &[Stage],
    exclude_id: Option<i64>,
) -> Result<(), DomainError> {
    let taken: bool = existing
        .iter()
        .filter(|stage| stage.is_active() && Some(stage.id) != exclude_id)
        .any(|stage| same_name(&stage.name, name));

    if taken {
        return Err(DomainError::DuplicateStage(name.trim().to_string()));
    }
    Ok(())
}

/// Validates that a modality name is unique among active modalities.
///
/// # Errors
///
/// Returns `DomainError::DuplicateModality` if another active modality has
/// the same name ignoring case and surrounding whitespace.
pub fn validate_modality_name_unique(
    name: &str,
    existing: &[Modality],
    exclude_id: Option<i64>,
) -> Result<(), DomainError> {
    let taken: bool = existing
        .iter()
        .filter(|modality| modality.is_active() && Some(modality.id) != exclude_id)
        .any(|modality| same_name(&modality.name, name));

    if taken {
        return Err(DomainError::DuplicateModality(name.trim().to_string()));
    }
    Ok(())
}

/// Validates that no other active holiday falls on `date`.
///
/// # Errors
///
/// Returns `DomainError::DuplicateHoliday` if the date is taken.
pub fn validate_holiday_date_unique(
    date: Date,
    existing: &[Holiday],
    exclude_id: Option<i64>,
) -> Result<(), DomainError> {
    let taken: bool = existing.iter().any(|holiday| {
        holiday.is_active() && Some(holiday.id) != exclude_id && holiday.date == date
    });

    if taken {
        return Err(DomainError::DuplicateHoliday { date });
    }
    Ok(())
}

/// Validates that at most one active link exists per (modality, stage) pair.
///
/// Disabled links still count: only deletion frees the pair.
///
/// # Errors
///
/// Returns `DomainError::DuplicateModalityStage` if another active link
/// joins the same modality and stage.
pub fn validate_link_unique(
    modality_id: i64,
    stage_id: i64,
    existing: &[ModalityStage],
    exclude_id: Option<i64>,
) -> Result<(), DomainError> {
    let taken: bool = existing.iter().any(|link| {
        link.is_active()
            && Some(link.id) != exclude_id
            && link.modality_id == modality_id
            && link.stage_id == stage_id
    });

    if taken {
        return Err(DomainError::DuplicateModalityStage {
            modality_id,
            stage_id,
        });
    }
    Ok(())
}
