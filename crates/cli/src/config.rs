// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data file loading.
//!
//! The file is JSON. Stages and modalities are referenced by name; ids are
//! assigned as the entries are applied, in file order.

use plazos::{Command, CoreError, State, apply, apply_all};
use plazos_audit::{Actor, Cause};
use plazos_domain::{Amount, BusinessDays};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

/// Errors raised while loading a reference data file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read reference data from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid reference data JSON.
    #[error("Failed to parse reference data in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A record's generation timestamp is not RFC 3339.
    #[error("Invalid generation timestamp '{value}' for record '{title}': {source}")]
    InvalidTimestamp {
        title: String,
        value: String,
        source: time::error::Parse,
    },

    /// A modality name matches no active modality.
    #[error("Unknown modality '{0}'")]
    UnknownModality(String),

    /// A modality links a stage that is not listed.
    #[error("Modality '{modality}' links unknown stage '{stage}'")]
    UnknownStage { modality: String, stage: String },

    /// An entry broke a reference data rule.
    #[error("Reference data rejected: {0}")]
    Rejected(#[from] CoreError),
}

/// A holiday entry.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayEntry {
    /// The holiday's date as `YYYY-MM-DD`.
    #[serde(with = "plazos_domain::ymd")]
    pub date: Date,
    /// The display name.
    pub name: String,
}

/// One stage of a modality.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkEntry {
    /// The stage name.
    pub stage: String,
    /// Business days from the record start.
    #[serde(default)]
    pub days: BusinessDays,
    /// Whether the stage is scheduled.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

const fn enabled_by_default() -> bool {
    true
}

/// A modality and its stages.
#[derive(Debug, Clone, Deserialize)]
pub struct ModalityEntry {
    /// The modality name.
    pub name: String,
    /// Linked stages, in scheduling order.
    #[serde(default)]
    pub stages: Vec<LinkEntry>,
}

/// A procurement record to create after the reference data.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordEntry {
    pub title: String,
    #[serde(with = "plazos_domain::ymd")]
    pub start_date: Date,
    /// Modality name.
    pub modality: String,
    pub amount: Amount,
    /// RFC 3339 instant, e.g. `2025-01-17T14:05:00Z`.
    pub generated_at: String,
    /// Email of the creating user.
    pub created_by: String,
}

/// The contents of a reference data file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub holidays: Vec<HolidayEntry>,
    #[serde(default)]
    pub stages: Vec<String>,
    #[serde(default)]
    pub modalities: Vec<ModalityEntry>,
    #[serde(default)]
    pub records: Vec<RecordEntry>,
}

impl ReferenceData {
    /// Reads and parses a reference data file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Reading reference data");
        let text: String = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies every entry to an empty state.
    ///
    /// Reference data is applied as the `import` system actor. Each record
    /// is created by its own `created_by` user.
    ///
    /// # Errors
    ///
    /// Returns an error if a name cannot be resolved, a timestamp is
    /// malformed, or an entry violates a reference data rule.
    pub fn build_state(&self) -> Result<State, ConfigError> {
        let actor: Actor = Actor::system("import");
        let cause: Cause = Cause::new(
            String::from("reference-data"),
            String::from("Reference data import"),
        );

        let mut commands: Vec<Command> = Vec::new();
        for holiday in &self.holidays {
            commands.push(Command::CreateHoliday {
                date: holiday.date,
                name: holiday.name.clone(),
            });
        }
        for stage in &self.stages {
            commands.push(Command::CreateStage {
                name: stage.clone(),
            });
        }
        for modality in &self.modalities {
            commands.push(Command::CreateModality {
                name: modality.name.clone(),
            });
        }
        let (mut state, _events) = apply_all(&State::new(), commands, &actor, &cause)?;

        for modality in &self.modalities {
            let modality_id: i64 = state
                .modality_named(&modality.name)
                .ok_or_else(|| ConfigError::UnknownModality(modality.name.clone()))?
                .id;
            for link in &modality.stages {
                let stage_id: i64 = state
                    .stage_named(&link.stage)
                    .ok_or_else(|| ConfigError::UnknownStage {
                        modality: modality.name.clone(),
                        stage: link.stage.clone(),
                    })?
                    .id;
                let command: Command = Command::LinkStage {
                    modality_id,
                    stage_id,
                    duration: link.days,
                    enabled: link.enabled,
                };
                state = apply(&state, command, actor.clone(), cause.clone())?.new_state;
            }
        }

        for record in &self.records {
            let command: Command = record.to_command(&state)?;
            let creator: Actor = Actor::user(&record.created_by);
            state = apply(&state, command, creator, cause.clone())?.new_state;
        }

        info!(
            holidays = self.holidays.len(),
            stages = self.stages.len(),
            modalities = self.modalities.len(),
            records = self.records.len(),
            "Loaded reference data"
        );
        Ok(state)
    }
}

impl RecordEntry {
    fn to_command(&self, state: &State) -> Result<Command, ConfigError> {
        let modality_id: i64 = state
            .modality_named(&self.modality)
            .ok_or_else(|| ConfigError::UnknownModality(self.modality.clone()))?
            .id;
        let generated_at: OffsetDateTime = OffsetDateTime::parse(&self.generated_at, &Rfc3339)
            .map_err(|source| ConfigError::InvalidTimestamp {
                title: self.title.clone(),
                value: self.generated_at.clone(),
                source,
            })?;

        Ok(Command::CreateRecord {
            title: self.title.clone(),
            start_date: self.start_date,
            modality_id,
            amount: self.amount,
            generated_at,
        })
    }
}

/// Loads a reference data file straight into state.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or applied.
pub fn load_state(path: &Path) -> Result<State, ConfigError> {
    ReferenceData::load(path)?.build_state()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use plazos_domain::{DomainError, StageDuration};
    use time::macros::date;

    const SAMPLE: &str = include_str!("../data/reference.json");

    fn parse(json: &str) -> ReferenceData {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_sample_reference_data_loads() {
        let state: State = parse(SAMPLE).build_state().unwrap();

        assert_eq!(state.active_holidays(Some(2025)).len(), 11);
        assert_eq!(state.active_modalities().len(), 3);
        assert_eq!(state.records.len(), 2);
        assert_eq!(state.records[0].created_by, "compras@municipio.gob.bo");
    }

    #[test]
    fn test_sample_disabled_stage_is_not_scheduled() {
        let state: State = parse(SAMPLE).build_state().unwrap();
        let modality_id: i64 = state.modality_named("Licitación Pública").unwrap().id;

        let durations: Vec<StageDuration> = state.stage_durations(modality_id).unwrap();

        assert_eq!(state.active_links(modality_id).len(), 6);
        assert_eq!(durations.len(), 5);
        assert!(durations.iter().all(|d| d.stage != "Reunión de aclaración"));
    }

    #[test]
    fn test_link_defaults() {
        let data: ReferenceData = parse(
            r#"{
                "stages": ["Publicación"],
                "modalities": [{ "name": "ANPE", "stages": [{ "stage": "Publicación" }] }]
            }"#,
        );

        let state: State = data.build_state().unwrap();
        let link = state.link(1).unwrap();

        assert_eq!(link.duration, BusinessDays::new(0));
        assert!(link.enabled);
        assert_eq!(link.modified_by.as_deref(), Some("import"));
    }

    #[test]
    fn test_unknown_stage_is_reported() {
        let data: ReferenceData = parse(
            r#"{
                "stages": ["Publicación"],
                "modalities": [{ "name": "ANPE", "stages": [{ "stage": "Apertura", "days": 3 }] }]
            }"#,
        );

        let err: ConfigError = data.build_state().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Modality 'ANPE' links unknown stage 'Apertura'"
        );
    }

    #[test]
    fn test_duplicate_holiday_is_rejected() {
        let data: ReferenceData = parse(
            r#"{
                "holidays": [
                    { "date": "2025-05-01", "name": "Día del Trabajo" },
                    { "date": "2025-05-01", "name": "Otro" }
                ]
            }"#,
        );

        let err: ConfigError = data.build_state().unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Rejected(CoreError::DomainViolation(DomainError::DuplicateHoliday {
                date
            })) if date == date!(2025 - 05 - 01)
        ));
    }

    #[test]
    fn test_negative_days_fail_to_parse() {
        let result: Result<ReferenceData, serde_json::Error> = serde_json::from_str(
            r#"{ "modalities": [{ "name": "ANPE", "stages": [{ "stage": "X", "days": -2 }] }] }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_bad_timestamp_is_reported() {
        let data: ReferenceData = parse(
            r#"{
                "modalities": [{ "name": "ANPE" }],
                "records": [{
                    "title": "Compra",
                    "start_date": "2025-01-20",
                    "modality": "ANPE",
                    "amount": "10.00",
                    "generated_at": "ayer",
                    "created_by": "compras@municipio.gob.bo"
                }]
            }"#,
        );

        let err: ConfigError = data.build_state().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err: ConfigError = load_state(Path::new("/nonexistent/reference.json")).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
