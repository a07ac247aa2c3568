// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use plazos_domain::{Amount, BusinessDays};
use time::{Date, OffsetDateTime};

/// A command represents staff or system intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a holiday.
    CreateHoliday {
        /// The holiday's calendar date.
        date: Date,
        /// The display name.
        name: String,
    },
    /// Change a holiday's date and/or name.
    UpdateHoliday {
        /// The holiday to update.
        holiday_id: i64,
        /// The new date, if changing.
        date: Option<Date>,
        /// The new name, if changing.
        name: Option<String>,
    },
    /// Soft-delete a holiday.
    DeleteHoliday {
        /// The holiday to delete.
        holiday_id: i64,
    },
    /// Create a stage.
    CreateStage {
        /// The stage name.
        name: String,
    },
    /// Rename a stage.
    RenameStage {
        /// The stage to rename.
        stage_id: i64,
        /// The new name.
        name: String,
    },
    /// Soft-delete a stage. Its links stop taking part in scheduling.
    DeleteStage {
        /// The stage to delete.
        stage_id: i64,
    },
    /// Create a modality.
    CreateModality {
        /// The modality name.
        name: String,
    },
    /// Rename a modality.
    RenameModality {
        /// The modality to rename.
        modality_id: i64,
        /// The new name.
        name: String,
    },
    /// Soft-delete a modality.
    DeleteModality {
        /// The modality to delete.
        modality_id: i64,
    },
    /// Link a stage to a modality with a business-day duration.
    LinkStage {
        /// The modality.
        modality_id: i64,
        /// The stage.
        stage_id: i64,
        /// Offset from the record start date.
        duration: BusinessDays,
        /// Whether the stage is scheduled.
        enabled: bool,
    },
    /// Edit a modality-stage link. `None` fields are left unchanged.
    UpdateLink {
        /// The link to edit.
        link_id: i64,
        /// Move the link to another modality.
        modality_id: Option<i64>,
        /// Point the link at another stage.
        stage_id: Option<i64>,
        /// New duration.
        duration: Option<BusinessDays>,
        /// Enable or disable the stage.
        enabled: Option<bool>,
    },
    /// Soft-delete a modality-stage link.
    DeleteLink {
        /// The link to delete.
        link_id: i64,
    },
    /// Create a procurement record and compute its schedule.
    ///
    /// The creating user is the command's actor.
    CreateRecord {
        /// The procurement title.
        title: String,
        /// The process start date.
        start_date: Date,
        /// The modality whose active links define the schedule.
        modality_id: i64,
        /// The contract amount.
        amount: Amount,
        /// The generation timestamp stored on the record.
        generated_at: OffsetDateTime,
    },
    /// Soft-delete a procurement record.
    DeleteRecord {
        /// The record to delete.
        record_id: i64,
    },
}

impl Command {
    /// The command's name as recorded in audit events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateHoliday { .. } => "CreateHoliday",
            Self::UpdateHoliday { .. } => "UpdateHoliday",
            Self::DeleteHoliday { .. } => "DeleteHoliday",
            Self::CreateStage { .. } => "CreateStage",
            Self::RenameStage { .. } => "RenameStage",
            Self::DeleteStage { .. } => "DeleteStage",
            Self::CreateModality { .. } => "CreateModality",
            Self::RenameModality { .. } => "RenameModality",
            Self::DeleteModality { .. } => "DeleteModality",
            Self::LinkStage { .. } => "LinkStage",
            Self::UpdateLink { .. } => "UpdateLink",
            Self::DeleteLink { .. } => "DeleteLink",
            Self::CreateRecord { .. } => "CreateRecord",
            Self::DeleteRecord { .. } => "DeleteRecord",
        }
    }
}
