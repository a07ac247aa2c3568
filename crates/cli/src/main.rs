// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod config;
mod report;

use clap::{Args as ClapArgs, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use config::{ConfigError, load_state};
use plazos::{
    Command as CoreCommand, RecordPage, RecordQuery, State, TransitionResult, apply, list_records,
};
use plazos_audit::{Actor, Cause};
use plazos_domain::{
    Amount, BusinessDays, HolidayCalendar, Modality, ProcurementRecord, Schedule, StageDuration,
    Tz, compute_schedule, format_record_summary, parse_date, parse_timezone,
};
use std::path::PathBuf;
use time::{Date, OffsetDateTime};
use tracing::info;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

/// Timezone used to display generation timestamps.
const DEFAULT_TIMEZONE: &str = "America/La_Paz";

/// Plazos - business-day schedules for procurement processes
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute stage dates from a start date
    #[command(visible_alias = "s")]
    Schedule(ScheduleArgs),

    /// Create a record from reference data and print its share summary
    Summary(SummaryArgs),

    /// List the holidays in a reference data file
    Holidays {
        /// Reference data file
        #[arg(short, long)]
        config: PathBuf,

        /// Only list holidays in this year
        #[arg(long)]
        year: Option<i32>,
    },

    /// List the stages linked to a modality
    Stages {
        /// Reference data file
        #[arg(short, long)]
        config: PathBuf,

        /// Modality name
        #[arg(short, long)]
        modality: String,
    },

    /// List the records in a reference data file, newest first
    Records(RecordsArgs),
}

#[derive(Debug, ClapArgs)]
struct ScheduleArgs {
    /// Process start date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    start: Date,

    /// Reference data file supplying holidays and modalities
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Take the stages from this modality in the reference data
    #[arg(short, long, requires = "config", conflicts_with = "stages")]
    modality: Option<String>,

    /// A stage as NAME=DAYS; repeat for each stage, in order
    #[arg(long = "stage", value_parser = parse_stage)]
    stages: Vec<StageDuration>,

    /// An extra holiday (YYYY-MM-DD); repeatable
    #[arg(long = "holiday", value_parser = parse_date)]
    holidays: Vec<Date>,

    /// Print the schedule as JSON with UTC-midnight instants
    #[arg(long)]
    json: bool,
}

#[derive(Debug, ClapArgs)]
struct SummaryArgs {
    /// Reference data file
    #[arg(short, long)]
    config: PathBuf,

    /// Modality name
    #[arg(short, long)]
    modality: String,

    /// Process start date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    start: Date,

    /// Procurement title
    #[arg(long)]
    title: String,

    /// Contract amount, e.g. 15000.50
    #[arg(long)]
    amount: Amount,

    /// Email of the user creating the record
    #[arg(long)]
    created_by: Option<String>,

    /// IANA timezone for the generation timestamp
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,
}

#[derive(Debug, ClapArgs)]
struct RecordsArgs {
    /// Reference data file
    #[arg(short, long)]
    config: PathBuf,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Records per page
    #[arg(long, default_value_t = plazos::DEFAULT_PAGE_LIMIT)]
    limit: u32,

    /// Only records whose title or modality contains this text
    #[arg(long)]
    search: Option<String>,

    /// IANA timezone for generation timestamps
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

/// Parses a `NAME=DAYS` stage argument.
fn parse_stage(value: &str) -> Result<StageDuration, String> {
    let (name, days) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=DAYS, got '{value}'"))?;
    if name.trim().is_empty() {
        return Err(format!("missing stage name in '{value}'"));
    }
    let days: BusinessDays = days.parse().map_err(|e| format!("{e}"))?;
    Ok(StageDuration::new(name.trim(), i64::from(days.days())))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    // RUST_LOG wins over the verbosity flags when set.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::default().add_directive(args.log_level().into())),
        )
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    args.run()
}

impl Args {
    fn log_level(&self) -> tracing::level_filters::LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    fn run(self) -> Result<()> {
        match self.command {
            Command::Schedule(args) => run_schedule(args),
            Command::Summary(args) => run_summary(args),
            Command::Holidays { config, year } => {
                let state: State = load_state(&config)?;
                print!("{}", report::holiday_table(&state.active_holidays(year))?);
                Ok(())
            }
            Command::Stages { config, modality } => {
                let state: State = load_state(&config)?;
                let modality: &Modality = find_modality(&state, &modality)?;
                print!(
                    "{}",
                    report::link_table(&state, &state.active_links(modality.id))
                );
                Ok(())
            }
            Command::Records(args) => run_records(args),
        }
    }
}

fn find_modality<'a>(state: &'a State, name: &str) -> Result<&'a Modality, ConfigError> {
    state
        .modality_named(name)
        .ok_or_else(|| ConfigError::UnknownModality(name.to_string()))
}

fn run_schedule(args: ScheduleArgs) -> Result<()> {
    let state: Option<State> = args.config.as_deref().map(load_state).transpose()?;

    let durations: Vec<StageDuration> = match (&args.modality, &state) {
        (Some(name), Some(state)) => state.stage_durations(find_modality(state, name)?.id)?,
        _ if args.stages.is_empty() => {
            return Err(eyre!("no stages given; pass --modality or --stage NAME=DAYS"));
        }
        _ => args.stages,
    };

    let mut holidays: Vec<Date> = args.holidays;
    if let Some(state) = &state {
        holidays.extend(state.holiday_calendar_from(args.start.year()).iter());
    }
    let calendar: HolidayCalendar = holidays.into_iter().collect();

    let schedule: Schedule = compute_schedule(args.start, &durations, &calendar)?;
    info!(
        start = %args.start,
        stages = schedule.len(),
        holidays = calendar.len(),
        "Computed schedule"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
    } else {
        print!("{}", report::schedule_table(args.start, &schedule)?);
    }
    Ok(())
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    let tz: Tz = parse_timezone(&args.timezone)?;
    let state: State = load_state(&args.config)?;
    let modality_id: i64 = find_modality(&state, &args.modality)?.id;

    let actor: Actor = args
        .created_by
        .as_deref()
        .map_or_else(|| Actor::system("plazos-cli"), Actor::user);
    let cause: Cause = Cause::new(
        String::from("cli-summary"),
        String::from("Summary requested from the command line"),
    );
    let command: CoreCommand = CoreCommand::CreateRecord {
        title: args.title,
        start_date: args.start,
        modality_id,
        amount: args.amount,
        generated_at: OffsetDateTime::now_utc(),
    };

    let result: TransitionResult = apply(&state, command, actor, cause)?;
    let record: &ProcurementRecord = result.new_state.record(result.entity_id())?;
    println!("{}", format_record_summary(record, tz)?);
    Ok(())
}

fn run_records(args: RecordsArgs) -> Result<()> {
    let tz: Tz = parse_timezone(&args.timezone)?;
    let state: State = load_state(&args.config)?;
    let query: RecordQuery = RecordQuery {
        page: args.page,
        limit: args.limit,
        search: args.search,
    };

    let page: RecordPage = list_records(&state, &query)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", report::record_table(&page, tz)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_stage() {
        assert_eq!(
            parse_stage("Apertura de sobres=8").unwrap(),
            StageDuration::new("Apertura de sobres", 8)
        );
        assert_eq!(parse_stage("X=").unwrap(), StageDuration::new("X", 0));
        assert!(parse_stage("Apertura").is_err());
        assert!(parse_stage("=3").is_err());
        assert!(parse_stage("Apertura=-1").is_err());
        assert!(parse_stage("Apertura=ocho").is_err());
    }

    #[test]
    fn test_schedule_args_parse() {
        let args: Args = Args::try_parse_from([
            "plazos",
            "schedule",
            "--start",
            "2025-01-03",
            "--stage",
            "Publicación=1",
            "--stage",
            "Apertura=2",
            "--holiday",
            "2025-01-06",
        ])
        .unwrap();

        let Command::Schedule(schedule) = args.command else {
            panic!("expected schedule subcommand");
        };
        assert_eq!(schedule.start, time::macros::date!(2025 - 01 - 03));
        assert_eq!(schedule.stages.len(), 2);
        assert_eq!(schedule.holidays, vec![time::macros::date!(2025 - 01 - 06)]);
    }

    #[test]
    fn test_modality_requires_config() {
        let result = Args::try_parse_from([
            "plazos",
            "schedule",
            "--start",
            "2025-01-03",
            "--modality",
            "ANPE",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_bad_start_date_is_rejected() {
        let result = Args::try_parse_from(["plazos", "schedule", "--start", "03/01/2025"]);

        assert!(result.is_err());
    }
}
