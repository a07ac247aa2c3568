// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{State, TransitionResult, next_id};
use plazos_audit::{Action, Actor, AuditEvent, Cause, EntityKind, StateSnapshot};
use plazos_domain::{
    BusinessDays, DomainError, Holiday, HolidayCalendar, Modality, ModalityStage,
    ProcurementRecord, Schedule, Stage, StageDuration, compute_schedule,
    validate_holiday_date_unique, validate_link_unique, validate_modality_name_unique,
    validate_name, validate_stage_name_unique,
};
use time::Date;
use tracing::{info, warn};

/// What a single command changed, before it is wrapped in an audit event.
struct Change {
    state: State,
    entity: EntityKind,
    entity_id: i64,
    details: String,
}

/// Applies a command to the current state, producing a new state and audit event.
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action; records store it as their creator
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - A referenced entity does not exist or was deleted
/// - A name is empty, or a uniqueness rule is violated
/// - The record's schedule cannot be computed
#[allow(clippy::too_many_lines)]
pub fn apply(
    state: &State,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let command_name: &'static str = command.name();
    let before: StateSnapshot = state.to_snapshot();

    let change: Change = match command {
        Command::CreateHoliday { date, name } => create_holiday(state, date, &name)?,
        Command::UpdateHoliday {
            holiday_id,
            date,
            name,
        } => update_holiday(state, holiday_id, date, name)?,
        Command::DeleteHoliday { holiday_id } => {
            state.holiday(holiday_id)?;
            let mut new_state: State = state.clone();
            mark_deleted(&mut new_state.holidays, holiday_id, |h| h.id, |h| {
                h.deleted = true;
            });
            Change {
                state: new_state,
                entity: EntityKind::Holiday,
                entity_id: holiday_id,
                details: format!("Deleted holiday {holiday_id}"),
            }
        }
        Command::CreateStage { name } => create_stage(state, &name, &actor)?,
        Command::RenameStage { stage_id, name } => rename_stage(state, stage_id, &name, &actor)?,
        Command::DeleteStage { stage_id } => {
            state.stage(stage_id)?;
            let mut new_state: State = state.clone();
            mark_deleted(&mut new_state.stages, stage_id, |s| s.id, |s| {
                s.deleted = true;
                s.modified_by = Some(actor.id.clone());
            });
            Change {
                state: new_state,
                entity: EntityKind::Stage,
                entity_id: stage_id,
                details: format!("Deleted stage {stage_id}"),
            }
        }
        Command::CreateModality { name } => create_modality(state, &name)?,
        Command::RenameModality { modality_id, name } => {
            rename_modality(state, modality_id, &name)?
        }
        Command::DeleteModality { modality_id } => {
            state.modality(modality_id)?;
            let mut new_state: State = state.clone();
            mark_deleted(&mut new_state.modalities, modality_id, |m| m.id, |m| {
                m.deleted = true;
            });
            Change {
                state: new_state,
                entity: EntityKind::Modality,
                entity_id: modality_id,
                details: format!("Deleted modality {modality_id}"),
            }
        }
        Command::LinkStage {
            modality_id,
            stage_id,
            duration,
            enabled,
        } => {
            state.modality(modality_id)?;
            state.stage(stage_id)?;
            validate_link_unique(modality_id, stage_id, &state.links, None)?;

            let mut new_state: State = state.clone();
            let id: i64 = next_id(state.links.iter().map(|l| l.id));
            let mut link: ModalityStage = ModalityStage::new(id, modality_id, stage_id, duration);
            link.enabled = enabled;
            link.modified_by = Some(actor.id.clone());
            new_state.links.push(link);

            Change {
                state: new_state,
                entity: EntityKind::ModalityStage,
                entity_id: id,
                details: format!(
                    "Linked stage {stage_id} to modality {modality_id} with {duration} business days"
                ),
            }
        }
        Command::UpdateLink {
            link_id,
            modality_id,
            stage_id,
            duration,
            enabled,
        } => update_link(
            state,
            link_id,
            LinkUpdate {
                modality_id,
                stage_id,
                duration,
                enabled,
            },
            &actor,
        )?,
        Command::DeleteLink { link_id } => {
            state.link(link_id)?;
            let mut new_state: State = state.clone();
            mark_deleted(&mut new_state.links, link_id, |l| l.id, |l| {
                l.deleted = true;
                l.modified_by = Some(actor.id.clone());
            });
            Change {
                state: new_state,
                entity: EntityKind::ModalityStage,
                entity_id: link_id,
                details: format!("Deleted modality-stage link {link_id}"),
            }
        }
        Command::CreateRecord {
            title,
            start_date,
            modality_id,
            amount,
            generated_at,
        } => {
            validate_name("record", &title)?;
            let modality: &Modality = state.modality(modality_id)?;
            let durations: Vec<StageDuration> = state.stage_durations(modality_id)?;
            if durations.is_empty() {
                warn!(
                    modality_id,
                    modality = %modality.name,
                    "Modality has no enabled stages; record will have an empty schedule"
                );
            }
            let holidays: HolidayCalendar = state.holiday_calendar_from(start_date.year());
            let schedule: Schedule = compute_schedule(start_date, &durations, &holidays)?;

            let mut new_state: State = state.clone();
            let id: i64 = next_id(state.records.iter().map(|r| r.id));
            let details: String = format!(
                "Created record {id} '{}' for modality '{}' starting {start_date} with {} stages",
                title.trim(),
                modality.name,
                schedule.len()
            );
            new_state.records.push(ProcurementRecord {
                id,
                title: title.trim().to_string(),
                start_date,
                generated_at,
                amount,
                modality_id,
                modality_name: modality.name.clone(),
                created_by: actor.id.clone(),
                schedule,
                deleted: false,
            });

            Change {
                state: new_state,
                entity: EntityKind::Record,
                entity_id: id,
                details,
            }
        }
        Command::DeleteRecord { record_id } => {
            state.record(record_id)?;
            let mut new_state: State = state.clone();
            mark_deleted(&mut new_state.records, record_id, |r| r.id, |r| {
                r.deleted = true;
            });
            Change {
                state: new_state,
                entity: EntityKind::Record,
                entity_id: record_id,
                details: format!("Deleted record {record_id}"),
            }
        }
    };

    info!(
        command = command_name,
        entity = %change.entity,
        entity_id = change.entity_id,
        actor = %actor.id,
        "Applied command"
    );

    let after: StateSnapshot = change.state.to_snapshot();
    let action: Action = Action::new(command_name.to_string(), Some(change.details));
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        (change.entity, change.entity_id),
        before,
        after,
    );

    Ok(TransitionResult {
        new_state: change.state,
        audit_event,
    })
}

/// Applies a sequence of commands as one actor, stopping at the first failure.
///
/// # Errors
///
/// Returns the first command's error; no partial state is returned.
pub fn apply_all(
    state: &State,
    commands: Vec<Command>,
    actor: &Actor,
    cause: &Cause,
) -> Result<(State, Vec<AuditEvent>), CoreError> {
    let mut current: State = state.clone();
    let mut events: Vec<AuditEvent> = Vec::with_capacity(commands.len());

    for command in commands {
        let result: TransitionResult = apply(&current, command, actor.clone(), cause.clone())?;
        current = result.new_state;
        events.push(result.audit_event);
    }

    Ok((current, events))
}

fn mark_deleted<T>(
    items: &mut [T],
    id: i64,
    id_of: impl Fn(&T) -> i64,
    delete: impl FnOnce(&mut T),
) {
    if let Some(item) = items.iter_mut().find(|item| id_of(item) == id) {
        delete(item);
    }
}

fn create_holiday(state: &State, date: Date, name: &str) -> Result<Change, CoreError> {
    validate_name("holiday", name)?;
    validate_holiday_date_unique(date, &state.holidays, None)?;

    let mut new_state: State = state.clone();
    let id: i64 = next_id(state.holidays.iter().map(|h| h.id));
    new_state.holidays.push(Holiday::new(id, date, name.trim()));

    Ok(Change {
        state: new_state,
        entity: EntityKind::Holiday,
        entity_id: id,
        details: format!("Created holiday '{}' on {date}", name.trim()),
    })
}

fn update_holiday(
    state: &State,
    holiday_id: i64,
    date: Option<Date>,
    name: Option<String>,
) -> Result<Change, CoreError> {
    state.holiday(holiday_id)?;
    if date.is_none() && name.is_none() {
        return Err(DomainError::EmptyUpdate {
            kind: "holiday",
            id: holiday_id,
        }
        .into());
    }
    if let Some(name) = &name {
        validate_name("holiday", name)?;
    }
    if let Some(date) = date {
        validate_holiday_date_unique(date, &state.holidays, Some(holiday_id))?;
    }

    let mut new_state: State = state.clone();
    if let Some(holiday) = new_state.holidays.iter_mut().find(|h| h.id == holiday_id) {
        if let Some(date) = date {
            holiday.date = date;
        }
        if let Some(name) = name {
            holiday.name = name.trim().to_string();
        }
    }

    Ok(Change {
        state: new_state,
        entity: EntityKind::Holiday,
        entity_id: holiday_id,
        details: format!("Updated holiday {holiday_id}"),
    })
}

fn create_stage(state: &State, name: &str, actor: &Actor) -> Result<Change, CoreError> {
    validate_name("stage", name)?;
    validate_stage_name_unique(name, &state.stages, None)?;

    let mut new_state: State = state.clone();
    let id: i64 = next_id(state.stages.iter().map(|s| s.id));
    let mut stage: Stage = Stage::new(id, name);
    stage.modified_by = Some(actor.id.clone());
    new_state.stages.push(stage);

    Ok(Change {
        state: new_state,
        entity: EntityKind::Stage,
        entity_id: id,
        details: format!("Created stage '{}'", name.trim()),
    })
}

fn rename_stage(
    state: &State,
    stage_id: i64,
    name: &str,
    actor: &Actor,
) -> Result<Change, CoreError> {
    let previous: String = state.stage(stage_id)?.name.clone();
    validate_name("stage", name)?;
    validate_stage_name_unique(name, &state.stages, Some(stage_id))?;

    let mut new_state: State = state.clone();
    if let Some(stage) = new_state.stages.iter_mut().find(|s| s.id == stage_id) {
        stage.name = name.trim().to_string();
        stage.modified_by = Some(actor.id.clone());
    }

    Ok(Change {
        state: new_state,
        entity: EntityKind::Stage,
        entity_id: stage_id,
        details: format!("Renamed stage '{previous}' to '{}'", name.trim()),
    })
}

fn create_modality(state: &State, name: &str) -> Result<Change, CoreError> {
    validate_name("modality", name)?;
    validate_modality_name_unique(name, &state.modalities, None)?;

    let mut new_state: State = state.clone();
    let id: i64 = next_id(state.modalities.iter().map(|m| m.id));
    new_state.modalities.push(Modality::new(id, name));

    Ok(Change {
        state: new_state,
        entity: EntityKind::Modality,
        entity_id: id,
        details: format!("Created modality '{}'", name.trim()),
    })
}

fn rename_modality(state: &State, modality_id: i64, name: &str) -> Result<Change, CoreError> {
    let previous: String = state.modality(modality_id)?.name.clone();
    validate_name("modality", name)?;
    validate_modality_name_unique(name, &state.modalities, Some(modality_id))?;

    let mut new_state: State = state.clone();
    if let Some(modality) = new_state.modalities.iter_mut().find(|m| m.id == modality_id) {
        modality.name = name.trim().to_string();
    }

    Ok(Change {
        state: new_state,
        entity: EntityKind::Modality,
        entity_id: modality_id,
        details: format!("Renamed modality '{previous}' to '{}'", name.trim()),
    })
}

/// Fields of `Command::UpdateLink`; `None` leaves the field unchanged.
struct LinkUpdate {
    modality_id: Option<i64>,
    stage_id: Option<i64>,
    duration: Option<BusinessDays>,
    enabled: Option<bool>,
}

fn update_link(
    state: &State,
    link_id: i64,
    update: LinkUpdate,
    actor: &Actor,
) -> Result<Change, CoreError> {
    let current: &ModalityStage = state.link(link_id)?;
    if update.modality_id.is_none()
        && update.stage_id.is_none()
        && update.duration.is_none()
        && update.enabled.is_none()
    {
        return Err(DomainError::EmptyUpdate {
            kind: "modality-stage link",
            id: link_id,
        }
        .into());
    }

    let modality_id: i64 = update.modality_id.unwrap_or(current.modality_id);
    let stage_id: i64 = update.stage_id.unwrap_or(current.stage_id);
    if update.modality_id.is_some() || update.stage_id.is_some() {
        state.modality(modality_id)?;
        state.stage(stage_id)?;
        validate_link_unique(modality_id, stage_id, &state.links, Some(link_id))?;
    }

    let mut new_state: State = state.clone();
    if let Some(link) = new_state.links.iter_mut().find(|l| l.id == link_id) {
        link.modality_id = modality_id;
        link.stage_id = stage_id;
        if let Some(duration) = update.duration {
            link.duration = duration;
        }
        if let Some(enabled) = update.enabled {
            link.enabled = enabled;
        }
        link.modified_by = Some(actor.id.clone());
    }

    Ok(Change {
        state: new_state,
        entity: EntityKind::ModalityStage,
        entity_id: link_id,
        details: format!("Updated modality-stage link {link_id}"),
    })
}
