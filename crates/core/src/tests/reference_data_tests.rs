// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    ADJUDICACION, ANPE, APERTURA, LICITACION, PUBLICACION, apply_ok, create_seeded_state,
    create_test_actor, create_test_cause,
};
use crate::{Command, CoreError, State, TransitionResult, apply, apply_all};
use plazos_audit::{Actor, EntityKind};
use plazos_domain::{BusinessDays, DomainError, Holiday, ModalityStage, Stage, StageDuration};
use time::macros::date;

fn apply_err(state: &State, command: Command) -> DomainError {
    match apply(state, command, create_test_actor(), create_test_cause()) {
        Err(CoreError::DomainViolation(err)) => err,
        Ok(_) => panic!("command unexpectedly succeeded"),
    }
}

#[test]
fn test_seeded_state_has_expected_reference_data() {
    let state: State = create_seeded_state();

    assert_eq!(state.active_holidays(None).len(), 3);
    assert_eq!(state.active_stages().len(), 3);
    assert_eq!(state.active_modalities().len(), 2);
    assert_eq!(state.active_links(ANPE).len(), 3);
    assert!(state.active_links(LICITACION).is_empty());
}

#[test]
fn test_create_holiday_emits_audit_event() {
    let state: State = State::new();

    let result: TransitionResult = apply_ok(
        &state,
        Command::CreateHoliday {
            date: date!(2025 - 08 - 06),
            name: String::from("  Día de la Patria "),
        },
    );

    let holiday: &Holiday = result.new_state.holiday(1).unwrap();
    assert_eq!(holiday.name, "Día de la Patria");
    assert_eq!(result.entity_id(), 1);
    assert_eq!(result.audit_event.action.name, "CreateHoliday");
    assert_eq!(result.audit_event.entity, EntityKind::Holiday);
    assert_eq!(result.audit_event.actor.id, "compras@municipio.gob.bo");
    assert_eq!(
        result.audit_event.before.data,
        "holidays=0,stages=0,modalities=0,links=0,records=0"
    );
    assert_eq!(
        result.audit_event.after.data,
        "holidays=1,stages=0,modalities=0,links=0,records=0"
    );
}

#[test]
fn test_apply_does_not_mutate_input_state() {
    let state: State = create_seeded_state();
    let before: State = state.clone();

    let _result: TransitionResult = apply_ok(
        &state,
        Command::DeleteStage {
            stage_id: APERTURA,
        },
    );

    assert_eq!(state, before);
}

#[test]
fn test_duplicate_holiday_date_is_rejected() {
    let state: State = create_seeded_state();

    let err: DomainError = apply_err(
        &state,
        Command::CreateHoliday {
            date: date!(2025 - 01 - 01),
            name: String::from("Otro"),
        },
    );

    assert_eq!(
        err,
        DomainError::DuplicateHoliday {
            date: date!(2025 - 01 - 01)
        }
    );
}

#[test]
fn test_deleted_holiday_frees_its_date() {
    let state: State = create_seeded_state();
    let state: State = apply_ok(&state, Command::DeleteHoliday { holiday_id: 1 }).new_state;

    let result: TransitionResult = apply_ok(
        &state,
        Command::CreateHoliday {
            date: date!(2025 - 01 - 01),
            name: String::from("Año Nuevo"),
        },
    );

    assert_eq!(result.entity_id(), 4);
    assert!(result.new_state.holiday(1).is_err());
}

#[test]
fn test_update_holiday_changes_date_and_name() {
    let state: State = create_seeded_state();

    let result: TransitionResult = apply_ok(
        &state,
        Command::UpdateHoliday {
            holiday_id: 2,
            date: Some(date!(2025 - 01 - 23)),
            name: Some(String::from("Estado Plurinacional")),
        },
    );

    let holiday: &Holiday = result.new_state.holiday(2).unwrap();
    assert_eq!(holiday.date, date!(2025 - 01 - 23));
    assert_eq!(holiday.name, "Estado Plurinacional");
}

#[test]
fn test_update_holiday_may_keep_its_own_date() {
    let state: State = create_seeded_state();

    let result: TransitionResult = apply_ok(
        &state,
        Command::UpdateHoliday {
            holiday_id: 2,
            date: Some(date!(2025 - 01 - 22)),
            name: None,
        },
    );

    assert_eq!(
        result.new_state.holiday(2).unwrap().date,
        date!(2025 - 01 - 22)
    );
}

#[test]
fn test_empty_holiday_update_is_rejected() {
    let state: State = create_seeded_state();

    let err: DomainError = apply_err(
        &state,
        Command::UpdateHoliday {
            holiday_id: 2,
            date: None,
            name: None,
        },
    );

    assert_eq!(
        err,
        DomainError::EmptyUpdate {
            kind: "holiday",
            id: 2
        }
    );
}

#[test]
fn test_active_holidays_filters_by_year() {
    let state: State = create_seeded_state();

    let holidays: Vec<&Holiday> = state.active_holidays(Some(2025));

    assert_eq!(holidays.len(), 2);
    assert_eq!(holidays[0].date, date!(2025 - 01 - 01));
    assert_eq!(holidays[1].date, date!(2025 - 01 - 22));
}

#[test]
fn test_stage_names_are_unique_ignoring_case() {
    let state: State = create_seeded_state();

    let err: DomainError = apply_err(
        &state,
        Command::CreateStage {
            name: String::from("  apertura "),
        },
    );

    assert_eq!(err, DomainError::DuplicateStage(String::from("apertura")));
}

#[test]
fn test_empty_stage_name_is_rejected() {
    let state: State = State::new();

    let err: DomainError = apply_err(
        &state,
        Command::CreateStage {
            name: String::from("   "),
        },
    );

    assert!(matches!(err, DomainError::InvalidName { kind: "stage", .. }));
}

#[test]
fn test_rename_stage_records_modifier() {
    let state: State = create_seeded_state();

    let result: TransitionResult = apply_ok(
        &state,
        Command::RenameStage {
            stage_id: APERTURA,
            name: String::from("Apertura de sobres"),
        },
    );

    let stage: &Stage = result.new_state.stage(APERTURA).unwrap();
    assert_eq!(stage.name, "Apertura de sobres");
    assert_eq!(stage.modified_by.as_deref(), Some("compras@municipio.gob.bo"));
    assert!(
        result
            .audit_event
            .action
            .details
            .as_deref()
            .unwrap()
            .contains("Apertura de sobres")
    );
}

#[test]
fn test_rename_stage_to_same_name_with_new_case_is_allowed() {
    let state: State = create_seeded_state();

    let result: TransitionResult = apply_ok(
        &state,
        Command::RenameStage {
            stage_id: APERTURA,
            name: String::from("APERTURA"),
        },
    );

    assert_eq!(result.new_state.stage(APERTURA).unwrap().name, "APERTURA");
}

#[test]
fn test_deleted_stage_drops_out_of_schedule() {
    let state: State = create_seeded_state();
    let state: State = apply_ok(
        &state,
        Command::DeleteStage {
            stage_id: APERTURA,
        },
    )
    .new_state;

    let durations: Vec<StageDuration> = state.stage_durations(ANPE).unwrap();

    assert_eq!(
        durations,
        vec![
            StageDuration::new("Publicación", 1),
            StageDuration::new("Adjudicación", 12),
        ]
    );
    // The link itself is untouched.
    assert!(state.link(2).is_ok());
}

#[test]
fn test_modality_names_are_unique() {
    let state: State = create_seeded_state();

    let err: DomainError = apply_err(
        &state,
        Command::CreateModality {
            name: String::from("anpe"),
        },
    );

    assert_eq!(err, DomainError::DuplicateModality(String::from("anpe")));
}

#[test]
fn test_deleted_modality_has_no_links_or_durations() {
    let state: State = create_seeded_state();
    let state: State = apply_ok(&state, Command::DeleteModality { modality_id: ANPE }).new_state;

    assert!(state.active_links(ANPE).is_empty());
    assert_eq!(
        state.stage_durations(ANPE),
        Err(DomainError::ModalityNotFound(ANPE))
    );
}

#[test]
fn test_rename_missing_modality_fails() {
    let state: State = create_seeded_state();

    let err: DomainError = apply_err(
        &state,
        Command::RenameModality {
            modality_id: 99,
            name: String::from("Directa"),
        },
    );

    assert_eq!(err, DomainError::ModalityNotFound(99));
}

#[test]
fn test_link_pair_is_unique() {
    let state: State = create_seeded_state();

    let err: DomainError = apply_err(
        &state,
        Command::LinkStage {
            modality_id: ANPE,
            stage_id: APERTURA,
            duration: BusinessDays::new(3),
            enabled: true,
        },
    );

    assert_eq!(
        err,
        DomainError::DuplicateModalityStage {
            modality_id: ANPE,
            stage_id: APERTURA
        }
    );
}

#[test]
fn test_disabled_link_still_occupies_its_pair() {
    let state: State = create_seeded_state();
    let state: State = apply_ok(
        &state,
        Command::UpdateLink {
            link_id: 2,
            modality_id: None,
            stage_id: None,
            duration: None,
            enabled: Some(false),
        },
    )
    .new_state;

    let err: DomainError = apply_err(
        &state,
        Command::LinkStage {
            modality_id: ANPE,
            stage_id: APERTURA,
            duration: BusinessDays::new(3),
            enabled: true,
        },
    );

    assert!(matches!(err, DomainError::DuplicateModalityStage { .. }));
}

#[test]
fn test_disabled_link_is_listed_but_not_scheduled() {
    let state: State = create_seeded_state();
    let state: State = apply_ok(
        &state,
        Command::UpdateLink {
            link_id: 2,
            modality_id: None,
            stage_id: None,
            duration: None,
            enabled: Some(false),
        },
    )
    .new_state;

    assert_eq!(state.active_links(ANPE).len(), 3);
    assert_eq!(state.stage_durations(ANPE).unwrap().len(), 2);
}

#[test]
fn test_deleted_link_frees_its_pair() {
    let state: State = create_seeded_state();
    let state: State = apply_ok(&state, Command::DeleteLink { link_id: 2 }).new_state;

    let result: TransitionResult = apply_ok(
        &state,
        Command::LinkStage {
            modality_id: ANPE,
            stage_id: APERTURA,
            duration: BusinessDays::new(5),
            enabled: true,
        },
    );

    assert_eq!(result.entity_id(), 4);
    let durations: Vec<StageDuration> = result.new_state.stage_durations(ANPE).unwrap();
    assert_eq!(durations[2], StageDuration::new("Apertura", 5));
}

#[test]
fn test_link_to_missing_stage_fails() {
    let state: State = create_seeded_state();

    let err: DomainError = apply_err(
        &state,
        Command::LinkStage {
            modality_id: LICITACION,
            stage_id: 42,
            duration: BusinessDays::new(1),
            enabled: true,
        },
    );

    assert_eq!(err, DomainError::StageNotFound(42));
}

#[test]
fn test_move_link_checks_target_pair() {
    let state: State = create_seeded_state();

    let err: DomainError = apply_err(
        &state,
        Command::UpdateLink {
            link_id: 2,
            modality_id: None,
            stage_id: Some(PUBLICACION),
            duration: None,
            enabled: None,
        },
    );

    assert_eq!(
        err,
        DomainError::DuplicateModalityStage {
            modality_id: ANPE,
            stage_id: PUBLICACION
        }
    );
}

#[test]
fn test_update_link_duration() {
    let state: State = create_seeded_state();

    let result: TransitionResult = apply_ok(
        &state,
        Command::UpdateLink {
            link_id: 3,
            modality_id: None,
            stage_id: None,
            duration: Some(BusinessDays::new(20)),
            enabled: None,
        },
    );

    let link: &ModalityStage = result.new_state.link(3).unwrap();
    assert_eq!(link.duration, BusinessDays::new(20));
    assert_eq!(link.stage_id, ADJUDICACION);
    assert!(link.enabled);
}

#[test]
fn test_empty_link_update_is_rejected() {
    let state: State = create_seeded_state();

    let err: DomainError = apply_err(
        &state,
        Command::UpdateLink {
            link_id: 3,
            modality_id: None,
            stage_id: None,
            duration: None,
            enabled: None,
        },
    );

    assert!(matches!(err, DomainError::EmptyUpdate { id: 3, .. }));
}

#[test]
fn test_apply_all_stops_at_first_failure() {
    let commands: Vec<Command> = vec![
        Command::CreateStage {
            name: String::from("Publicación"),
        },
        Command::CreateStage {
            name: String::from("publicación"),
        },
    ];

    let result = apply_all(
        &State::new(),
        commands,
        &Actor::system("import"),
        &create_test_cause(),
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::DuplicateStage(
            String::from("publicación")
        )))
    );
}

#[test]
fn test_lookup_by_name_ignores_case() {
    let state: State = create_seeded_state();

    assert_eq!(state.stage_named(" apertura ").unwrap().id, APERTURA);
    assert_eq!(state.modality_named("licitación pública").unwrap().id, LICITACION);
    assert!(state.modality_named("Directa").is_none());
}

#[test]
fn test_lookup_by_name_skips_deleted() {
    let state: State = create_seeded_state();
    let state: State = apply_ok(
        &state,
        Command::DeleteStage {
            stage_id: PUBLICACION,
        },
    )
    .new_state;

    assert!(state.stage_named("Publicación").is_none());
}
