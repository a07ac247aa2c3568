// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, State, TransitionResult, apply, apply_all};
use plazos_audit::{Actor, Cause};
use plazos_domain::{Amount, BusinessDays};
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

pub const ANPE: i64 = 1;
pub const LICITACION: i64 = 2;

pub const PUBLICACION: i64 = 1;
pub const APERTURA: i64 = 2;
pub const ADJUDICACION: i64 = 3;

pub fn create_test_actor() -> Actor {
    Actor::user("compras@municipio.gob.bo")
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Form submission"))
}

/// Applies one command as the test actor, panicking on failure.
pub fn apply_ok(state: &State, command: Command) -> TransitionResult {
    apply(state, command, create_test_actor(), create_test_cause()).unwrap()
}

fn link(modality_id: i64, stage_id: i64, days: u32) -> Command {
    Command::LinkStage {
        modality_id,
        stage_id,
        duration: BusinessDays::new(days),
        enabled: true,
    }
}

/// Reference data shared by most tests.
///
/// Holidays: 2025-01-01, 2025-01-22 and 2026-01-01.
/// ANPE links Publicación (1), Apertura (8) and Adjudicación (12).
/// Licitación Pública has no links.
pub fn create_seeded_state() -> State {
    let commands: Vec<Command> = vec![
        Command::CreateHoliday {
            date: date!(2025 - 01 - 01),
            name: String::from("Año Nuevo"),
        },
        Command::CreateHoliday {
            date: date!(2025 - 01 - 22),
            name: String::from("Día del Estado Plurinacional"),
        },
        Command::CreateHoliday {
            date: date!(2026 - 01 - 01),
            name: String::from("Año Nuevo"),
        },
        Command::CreateStage {
            name: String::from("Publicación"),
        },
        Command::CreateStage {
            name: String::from("Apertura"),
        },
        Command::CreateStage {
            name: String::from("Adjudicación"),
        },
        Command::CreateModality {
            name: String::from("ANPE"),
        },
        Command::CreateModality {
            name: String::from("Licitación Pública"),
        },
        link(ANPE, PUBLICACION, 1),
        link(ANPE, APERTURA, 8),
        link(ANPE, ADJUDICACION, 12),
    ];

    let (state, _events) = apply_all(
        &State::new(),
        commands,
        &Actor::system("seed"),
        &create_test_cause(),
    )
    .unwrap();
    state
}

pub fn create_record_command(
    title: &str,
    start_date: Date,
    generated_at: OffsetDateTime,
) -> Command {
    Command::CreateRecord {
        title: String::from(title),
        start_date,
        modality_id: ANPE,
        amount: "150000.50".parse::<Amount>().unwrap(),
        generated_at,
    }
}

pub fn default_generated_at() -> OffsetDateTime {
    datetime!(2025-01-06 13:30 UTC)
}
