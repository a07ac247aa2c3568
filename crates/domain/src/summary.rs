// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain-text record summary for copy and share.
//!
//! Scheduled dates are calendar dates and render as `dd/mm/yyyy` without
//! any timezone shift. Only the generation timestamp is an instant; it is
//! shown as wall-clock time in the caller's timezone.

use crate::error::DomainError;
use crate::record::ProcurementRecord;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt::Write as _;
use time::Date;

/// Parses an IANA timezone name such as `America/La_Paz`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` if the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Renders the share summary of a record.
///
/// # Example
///
/// ```text
/// 📄 *Título:* Compra de equipos
/// 💰 *Monto:* Bs. 15000.00
/// 📅 *Fecha de generación:* 02/01/2025 09:30:00
/// 🛠️ *Modalidad:* ANPE menor
///
/// 📌 *Fechas importantes:*
/// 📅 Fecha de Inicio: 03/01/2025
/// 📍 Publicación: 06/01/2025
/// ```
///
/// # Errors
///
/// Returns an error if a date cannot be formatted.
pub fn format_record_summary(record: &ProcurementRecord, tz: Tz) -> Result<String, DomainError> {
    let generated: String = format_timestamp(record.generated_at, tz)?;
    let mut text: String = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(text, "📄 *Título:* {}", record.title);
    let _ = writeln!(text, "💰 *Monto:* Bs. {}", record.amount);
    let _ = writeln!(text, "📅 *Fecha de generación:* {generated}");
    let _ = writeln!(text, "🛠️ *Modalidad:* {}", record.modality_name);
    let _ = writeln!(text);
    let _ = writeln!(text, "📌 *Fechas importantes:*");
    let _ = writeln!(
        text,
        "📅 Fecha de Inicio: {}",
        format_date(record.start_date)?
    );

    for entry in &record.schedule {
        let _ = writeln!(text, "📍 {}: {}", entry.stage, format_date(entry.date)?);
    }

    Ok(text.trim().to_string())
}

/// Formats a calendar date as `dd/mm/yyyy`.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_date(date: Date) -> Result<String, DomainError> {
    date.format(time::macros::format_description!("[day]/[month]/[year]"))
        .map_err(|e| DomainError::DateFormatError {
            error: e.to_string(),
        })
}

/// Formats an instant as `dd/mm/yyyy HH:MM:SS` wall-clock time in `tz`.
///
/// # Errors
///
/// Returns an error if the instant is outside chrono's supported range.
pub fn format_timestamp(instant: time::OffsetDateTime, tz: Tz) -> Result<String, DomainError> {
    let utc: DateTime<Utc> =
        DateTime::from_timestamp(instant.unix_timestamp(), instant.nanosecond()).ok_or_else(
            || DomainError::DateFormatError {
                error: format!("instant {instant} is out of range"),
            },
        )?;
    Ok(utc.with_timezone(&tz).format("%d/%m/%Y %H:%M:%S").to_string())
}
