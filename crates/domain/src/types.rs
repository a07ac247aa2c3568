// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::schedule::BusinessDays;
use serde::{Deserialize, Serialize};
use time::Date;

/// Entities that are logically deleted rather than removed.
///
/// Read paths skip deleted entities.
pub trait SoftDelete {
    /// Returns whether the entity has been logically deleted.
    fn is_deleted(&self) -> bool;

    /// Returns whether the entity is visible to read paths.
    fn is_active(&self) -> bool {
        !self.is_deleted()
    }
}

/// An explicit non-business calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The holiday's identifier.
    pub id: i64,
    /// The calendar date. Time of day never applies.
    #[serde(with = "crate::calendar::ymd")]
    pub date: Date,
    /// The display name.
    pub name: String,
    /// Soft-delete flag.
    #[serde(default)]
    pub deleted: bool,
}

impl Holiday {
    /// Creates a new, non-deleted holiday.
    #[must_use]
    pub fn new(id: i64, date: Date, name: &str) -> Self {
        Self {
            id,
            date,
            name: name.to_string(),
            deleted: false,
        }
    }

    /// The year the holiday belongs to.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.date.year()
    }
}

impl SoftDelete for Holiday {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// A named milestone type (e.g. "Publicación", "Apertura", "Adjudicación").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// The stage's identifier.
    pub id: i64,
    /// The stage name. Unique among active stages, ignoring case.
    pub name: String,
    /// Who last modified the stage.
    #[serde(default)]
    pub modified_by: Option<String>,
    /// Soft-delete flag.
    #[serde(default)]
    pub deleted: bool,
}

impl Stage {
    /// Creates a new, non-deleted stage.
    #[must_use]
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            modified_by: None,
            deleted: false,
        }
    }
}

impl SoftDelete for Stage {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// A procurement process type (e.g. "ANPE menor").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modality {
    /// The modality's identifier.
    pub id: i64,
    /// The modality name. Unique among active modalities, ignoring case.
    pub name: String,
    /// Soft-delete flag.
    #[serde(default)]
    pub deleted: bool,
}

impl Modality {
    /// Creates a new, non-deleted modality.
    #[must_use]
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            deleted: false,
        }
    }
}

impl SoftDelete for Modality {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// Assigns a stage to a modality with a duration in business days.
///
/// The set of active, enabled links of a modality is the configuration
/// the scheduler consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalityStage {
    /// The link's identifier.
    pub id: i64,
    /// The modality this link belongs to.
    pub modality_id: i64,
    /// The linked stage.
    pub stage_id: i64,
    /// Offset from the record's start date.
    #[serde(default)]
    pub duration: BusinessDays,
    /// Whether the stage is scheduled for the modality.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Who last modified the link.
    #[serde(default)]
    pub modified_by: Option<String>,
    /// Soft-delete flag.
    #[serde(default)]
    pub deleted: bool,
}

const fn enabled_by_default() -> bool {
    true
}

impl ModalityStage {
    /// Creates a new enabled, non-deleted link.
    #[must_use]
    pub const fn new(id: i64, modality_id: i64, stage_id: i64, duration: BusinessDays) -> Self {
        Self {
            id,
            modality_id,
            stage_id,
            duration,
            enabled: true,
            modified_by: None,
            deleted: false,
        }
    }

    /// Returns whether this link takes part in scheduling.
    #[must_use]
    pub const fn is_schedulable(&self) -> bool {
        self.enabled && !self.deleted
    }
}

impl SoftDelete for ModalityStage {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}
