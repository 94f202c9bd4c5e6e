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
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};
use serde::Serialize;
use shiftboard_api::{
    Caller, ListShiftVersionsResponse, MonthRequest, MonthResponse, PreviewPatternResponse,
    decode_pattern_json, describe_pattern, get_month, list_shift_versions,
    validate_pattern_input,
};
use shiftboard_domain::{PatternInput, ScheduleId, ScheduleRole, UserOid, parse_date};
use shiftboard_persistence::Persistence;
use time::{Date, OffsetDateTime};
use tracing::info;

mod demo;

/// shiftboard - rotation patterns and effective-dated shift schedules
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Date treated as today (YYYY-MM-DD). Defaults to the current UTC date.
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and create a schedule with its first manager
    Init {
        /// Schedule name
        #[arg(long)]
        name: String,

        /// Object id of the schedule's first manager
        #[arg(long)]
        manager: String,

        /// Display name of the first manager
        #[arg(long)]
        manager_name: Option<String>,
    },

    /// Create a demo schedule with patterns, shifts, assignments and events
    SeedDemo,

    /// Print the summary, predictions and cycle colours of a pattern file
    PreviewPattern {
        /// JSON file holding `{swatches, noShiftDays}`
        file: PathBuf,
    },

    /// Render one calendar month as JSON
    Month {
        #[arg(long)]
        schedule: i64,

        /// Object id of the caller
        #[arg(long)]
        user: String,

        #[arg(long)]
        year: i32,

        /// 0-based month index
        #[arg(long)]
        month_index: i32,
    },

    /// Print every dated version of a shift
    ShiftTimeline {
        #[arg(long)]
        schedule: i64,

        /// Object id of the caller
        #[arg(long)]
        user: String,

        /// Shift (employee type) id
        #[arg(long)]
        shift: i64,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitOutput {
    schedule_id: i64,
    manager: String,
}

fn open_persistence(database: Option<&PathBuf>) -> Result<Persistence> {
    let persistence: Persistence = match database {
        Some(path) => {
            info!(path = %path.display(), "Using file-based database");
            Persistence::new_with_file(path)
                .wrap_err_with(|| format!("Failed to open {}", path.display()))?
        }
        None => {
            info!("Using in-memory database");
            Persistence::new_in_memory()?
        }
    };
    Ok(persistence)
}

fn resolve_today(today: Option<&str>) -> Result<Date> {
    match today {
        Some(value) => Ok(parse_date(value)?),
        None => Ok(OffsetDateTime::now_utc().date()),
    }
}

fn caller(user: &str) -> Result<Caller> {
    Ok(Caller::new(UserOid::new(user)?))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json: String = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

impl Args {
    fn run(self) -> Result<()> {
        let today: Date = resolve_today(self.today.as_deref())?;

        match self.command {
            Command::Init {
                name,
                manager,
                manager_name,
            } => {
                let mut persistence: Persistence = open_persistence(self.database.as_ref())?;
                let manager: UserOid = UserOid::new(&manager)?;
                let schedule_id: ScheduleId = persistence.create_schedule(name.trim())?;
                persistence.upsert_member(
                    schedule_id,
                    &manager,
                    manager_name.as_deref(),
                    ScheduleRole::Manager,
                )?;
                info!(schedule_id = schedule_id.value(), "Initialized schedule");
                print_json(&InitOutput {
                    schedule_id: schedule_id.value(),
                    manager: manager.to_string(),
                })
            }
            Command::SeedDemo => {
                let mut persistence: Persistence = open_persistence(self.database.as_ref())?;
                let summary = demo::seed_demo(&mut persistence, today)?;
                print_json(&summary)
            }
            Command::PreviewPattern { file } => {
                let json: String = std::fs::read_to_string(&file)
                    .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
                let input: PatternInput = decode_pattern_json(&json)?;
                let preview: PreviewPatternResponse =
                    describe_pattern(validate_pattern_input(&input)?);
                print_json(&preview)
            }
            Command::Month {
                schedule,
                user,
                year,
                month_index,
            } => {
                let mut persistence: Persistence = open_persistence(self.database.as_ref())?;
                let month: MonthResponse = get_month(
                    &mut persistence,
                    &caller(&user)?,
                    ScheduleId::new(schedule),
                    &MonthRequest { year, month_index },
                )?;
                print_json(&month)
            }
            Command::ShiftTimeline {
                schedule,
                user,
                shift,
            } => {
                let mut persistence: Persistence = open_persistence(self.database.as_ref())?;
                let timeline: ListShiftVersionsResponse = list_shift_versions(
                    &mut persistence,
                    &caller(&user)?,
                    ScheduleId::new(schedule),
                    shift,
                )?;
                print_json(&timeline)
            }
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    args.run()
}
