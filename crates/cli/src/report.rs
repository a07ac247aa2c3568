// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain-text tables printed by the CLI.

use plazos::{RecordPage, State};
use plazos_domain::{
    DomainError, Holiday, ModalityStage, Schedule, Tz, format_date, format_timestamp,
};
use std::fmt::Write as _;
use time::Date;

/// Width of the label column; longer labels push the date right.
const LABEL_WIDTH: usize = 28;

/// Renders a schedule, starting with the record start date.
///
/// # Errors
///
/// Returns an error if a date cannot be formatted.
pub fn schedule_table(start: Date, schedule: &Schedule) -> Result<String, DomainError> {
    let mut out: String = String::new();
    let _ = writeln!(out, "{:<LABEL_WIDTH$} {}", "Fecha de Inicio", format_date(start)?);
    for entry in schedule {
        let _ = writeln!(out, "{:<LABEL_WIDTH$} {}", entry.stage, format_date(entry.date)?);
    }
    Ok(out)
}

/// Renders holidays one per line.
///
/// # Errors
///
/// Returns an error if a date cannot be formatted.
pub fn holiday_table(holidays: &[&Holiday]) -> Result<String, DomainError> {
    let mut out: String = String::new();
    for holiday in holidays {
        let _ = writeln!(out, "{}  {}", format_date(holiday.date)?, holiday.name);
    }
    Ok(out)
}

/// Renders a modality's links with stage names and durations.
#[must_use]
pub fn link_table(state: &State, links: &[&ModalityStage]) -> String {
    let mut out: String = String::new();
    for link in links {
        let stage: &str = state
            .stage(link.stage_id)
            .map_or("?", |stage| stage.name.as_str());
        let status: &str = if link.enabled { "" } else { "  (deshabilitada)" };
        let _ = writeln!(
            out,
            "{:<LABEL_WIDTH$} {:>3} días hábiles{status}",
            stage,
            link.duration.days()
        );
    }
    out
}

/// Renders one page of records followed by a pagination footer.
///
/// # Errors
///
/// Returns an error if a date or timestamp cannot be formatted.
pub fn record_table(page: &RecordPage<'_>, tz: Tz) -> Result<String, DomainError> {
    let mut out: String = String::new();
    for record in &page.records {
        let _ = writeln!(
            out,
            "#{:<4} {}  {}  {}  Bs. {}  ({})",
            record.id,
            format_timestamp(record.generated_at, tz)?,
            format_date(record.start_date)?,
            record.modality_name,
            record.amount,
            record.title
        );
    }
    let _ = writeln!(
        out,
        "Página {} de {} ({} registros)",
        page.pagination.current_page, page.pagination.total_pages, page.pagination.total_records
    );
    Ok(out)
}
