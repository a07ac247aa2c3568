// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use plazos_audit::{AuditEvent, StateSnapshot};
use plazos_domain::{
    DomainError, Holiday, HolidayCalendar, Modality, ModalityStage, ProcurementRecord,
    SoftDelete, Stage, StageDuration,
};

/// Reference data and procurement records.
///
/// Everything is soft-deleted: entities stay in their collection with the
/// deleted flag set, and every read path below skips them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// All holidays, deleted ones included.
    pub holidays: Vec<Holiday>,
    /// All stages, deleted ones included.
    pub stages: Vec<Stage>,
    /// All modalities, deleted ones included.
    pub modalities: Vec<Modality>,
    /// All modality-stage links, deleted ones included.
    pub links: Vec<ModalityStage>,
    /// All procurement records, deleted ones included.
    pub records: Vec<ProcurementRecord>,
}

/// Finds the active entity with `id`.
fn find_active<T: SoftDelete>(items: &[T], id: i64, id_of: impl Fn(&T) -> i64) -> Option<&T> {
    items.iter().find(|item| id_of(item) == id && item.is_active())
}

fn count_active<T: SoftDelete>(items: &[T]) -> usize {
    items.iter().filter(|item| item.is_active()).count()
}

/// The next identifier for a collection. Identifiers are never reused.
pub(crate) fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

impl State {
    /// Creates an empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            holidays: Vec::new(),
            stages: Vec::new(),
            modalities: Vec::new(),
            links: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Returns the active holiday with `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::HolidayNotFound` if it does not exist or was deleted.
    pub fn holiday(&self, id: i64) -> Result<&Holiday, DomainError> {
        find_active(&self.holidays, id, |h| h.id).ok_or(DomainError::HolidayNotFound(id))
    }

    /// Returns the active stage with `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StageNotFound` if it does not exist or was deleted.
    pub fn stage(&self, id: i64) -> Result<&Stage, DomainError> {
        find_active(&self.stages, id, |s| s.id).ok_or(DomainError::StageNotFound(id))
    }

    /// Returns the active modality with `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ModalityNotFound` if it does not exist or was deleted.
    pub fn modality(&self, id: i64) -> Result<&Modality, DomainError> {
        find_active(&self.modalities, id, |m| m.id).ok_or(DomainError::ModalityNotFound(id))
    }

    /// Returns the active modality-stage link with `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ModalityStageNotFound` if it does not exist or was deleted.
    pub fn link(&self, id: i64) -> Result<&ModalityStage, DomainError> {
        find_active(&self.links, id, |l| l.id).ok_or(DomainError::ModalityStageNotFound(id))
    }

    /// Returns the active procurement record with `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RecordNotFound` if it does not exist or was deleted.
    pub fn record(&self, id: i64) -> Result<&ProcurementRecord, DomainError> {
        find_active(&self.records, id, |r| r.id).ok_or(DomainError::RecordNotFound(id))
    }

    /// Looks up an active stage by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn stage_named(&self, name: &str) -> Option<&Stage> {
        let wanted: String = name.trim().to_lowercase();
        self.stages
            .iter()
            .find(|s| s.is_active() && s.name.to_lowercase() == wanted)
    }

    /// Looks up an active modality by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn modality_named(&self, name: &str) -> Option<&Modality> {
        let wanted: String = name.trim().to_lowercase();
        self.modalities
            .iter()
            .find(|m| m.is_active() && m.name.to_lowercase() == wanted)
    }

    /// Active holidays, optionally limited to one year, sorted by date.
    #[must_use]
    pub fn active_holidays(&self, year: Option<i32>) -> Vec<&Holiday> {
        let mut holidays: Vec<&Holiday> = self
            .holidays
            .iter()
            .filter(|h| h.is_active() && year.is_none_or(|y| h.year() == y))
            .collect();
        holidays.sort_by_key(|h| h.date);
        holidays
    }

    /// The holiday calendar consulted for a record starting in `start_year`.
    ///
    /// Holidays from `start_year` onward are included so that schedules
    /// running into the next year still skip its holidays.
    #[must_use]
    pub fn holiday_calendar_from(&self, start_year: i32) -> HolidayCalendar {
        HolidayCalendar::from_holidays(self.holidays.iter().filter(|h| h.year() >= start_year))
    }

    /// Active stages sorted by name.
    #[must_use]
    pub fn active_stages(&self) -> Vec<&Stage> {
        let mut stages: Vec<&Stage> = self.stages.iter().filter(|s| s.is_active()).collect();
        stages.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        stages
    }

    /// Active modalities sorted by name.
    #[must_use]
    pub fn active_modalities(&self) -> Vec<&Modality> {
        let mut modalities: Vec<&Modality> =
            self.modalities.iter().filter(|m| m.is_active()).collect();
        modalities.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        modalities
    }

    /// Active links of a modality, in link-id order.
    ///
    /// A link is listed only when the link, its modality and its stage are
    /// all active. Disabled links are listed.
    #[must_use]
    pub fn active_links(&self, modality_id: i64) -> Vec<&ModalityStage> {
        if self.modality(modality_id).is_err() {
            return Vec::new();
        }
        let mut links: Vec<&ModalityStage> = self
            .links
            .iter()
            .filter(|l| {
                l.is_active() && l.modality_id == modality_id && self.stage(l.stage_id).is_ok()
            })
            .collect();
        links.sort_by_key(|l| l.id);
        links
    }

    /// The stage durations the scheduler consumes for a modality.
    ///
    /// Only enabled links among `active_links` contribute, in link-id order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ModalityNotFound` if the modality does not exist
    /// or was deleted.
    pub fn stage_durations(&self, modality_id: i64) -> Result<Vec<StageDuration>, DomainError> {
        self.modality(modality_id)?;

        let mut durations: Vec<StageDuration> = Vec::new();
        for link in self.active_links(modality_id) {
            if !link.is_schedulable() {
                continue;
            }
            let stage: &Stage = self.stage(link.stage_id)?;
            durations.push(StageDuration::new(
                &stage.name,
                i64::from(link.duration.days()),
            ));
        }
        Ok(durations)
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "holidays={},stages={},modalities={},links={},records={}",
            count_active(&self.holidays),
            count_active(&self.stages),
            count_active(&self.modalities),
            count_active(&self.links),
            count_active(&self.records),
        ))
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

impl TransitionResult {
    /// The identifier of the entity the transition created or changed.
    #[must_use]
    pub const fn entity_id(&self) -> i64 {
        self.audit_event.entity_id
    }
}
