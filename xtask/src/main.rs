// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Developer automation for the shiftboard workspace, run as
//! `cargo xtask <command>` through the alias in `.cargo/config.toml`.
//!
//! `ci` is what the pipeline runs: clippy, rustfmt, typos, cargo-machete,
//! the build, the tests and finally `verify-migrations`.
//!
//! `verify-migrations` needs no external services. It applies the embedded
//! `SQLite` migrations to an in-memory database, checks the tables, foreign
//! keys and unique indexes the store depends on, then reverts everything.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::process::Output;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::{cmd, Expression};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Everything the pipeline checks
    CI,

    /// Build every target
    #[command(visible_alias = "b")]
    Build,

    /// Type-check every target
    #[command(visible_alias = "c")]
    Check,

    /// Report unused dependencies with cargo-machete
    #[command(visible_alias = "m")]
    Machete,

    /// Run clippy, rustfmt and typos in check mode
    #[command(visible_alias = "l")]
    Lint,

    /// Clippy with warnings denied
    #[command(visible_alias = "cl")]
    LintClippy,

    /// rustfmt in check mode
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Spell-check sources and docs with typos
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Apply clippy suggestions
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Reformat the workspace
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Apply typo corrections
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run unit, integration and doc tests
    #[command(visible_alias = "t")]
    Test,

    /// Apply and revert the `SQLite` migrations on a scratch database
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => cargo(&["build", "--workspace", "--all-targets"]),
            Self::Check => cargo(&["check", "--workspace", "--all-targets"]),
            Self::Machete => traced(&cmd!("cargo-machete")),
            Self::Lint => lint(),
            Self::LintClippy => cargo(&CLIPPY),
            Self::LintFormatting => cargo(&["fmt", "--all", "--check"]),
            Self::LintTypos => traced(&cmd!("typos")),
            Self::FixClippy => cargo(&CLIPPY_FIX),
            Self::FixFormatting => cargo(&["fmt", "--all"]),
            Self::FixTypos => traced(&cmd!("typos", "--write-changes")),
            Self::Test => cargo(&["test", "--workspace", "--all-targets"])
                .and_then(|()| cargo(&["test", "--workspace", "--doc"])),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

const CLIPPY: [&str; 6] = [
    "clippy",
    "--workspace",
    "--all-targets",
    "--",
    "-D",
    "warnings",
];

const CLIPPY_FIX: [&str; 9] = [
    "clippy",
    "--workspace",
    "--all-targets",
    "--fix",
    "--allow-dirty",
    "--allow-staged",
    "--",
    "-D",
    "warnings",
];

fn ci() -> Result<()> {
    lint()?;
    Command::Machete.run()?;
    Command::Build.run()?;
    Command::Test.run()?;
    verify_migrations()
}

fn lint() -> Result<()> {
    Command::LintClippy.run()?;
    Command::LintFormatting.run()?;
    Command::LintTypos.run()
}

fn cargo(args: &[&str]) -> Result<()> {
    traced(&cmd("cargo", args.iter().copied()))
}

fn traced(expression: &Expression) -> Result<()> {
    expression
        .run_with_trace()
        .wrap_err_with(|| format!("{expression:?} failed"))?;
    Ok(())
}

// ============================================================================
// Migration verification
// ============================================================================

/// Tables the store reads and writes.
const EXPECTED_TABLES: [&str; 8] = [
    "coverage_codes",
    "employee_type_versions",
    "employee_types",
    "patterns",
    "schedule_events",
    "schedule_user_types",
    "schedule_users",
    "schedules",
];

/// `(table, column, referenced table)`
const EXPECTED_FOREIGN_KEYS: [(&str, &str, &str); 7] = [
    ("employee_type_versions", "employee_type_id", "employee_types"),
    ("employee_type_versions", "pattern_id", "patterns"),
    ("employee_types", "schedule_id", "schedules"),
    ("patterns", "schedule_id", "schedules"),
    ("schedule_events", "coverage_code_id", "coverage_codes"),
    ("schedule_user_types", "employee_type_id", "employee_types"),
    ("schedule_user_types", "user_oid", "schedule_users"),
];

/// Unique indexes that keep timelines free of duplicate start dates and
/// coverage codes unique per schedule.
const EXPECTED_UNIQUE_INDEXES: [(&str, &str); 3] = [
    ("employee_type_versions", "idx_employee_type_versions_start"),
    ("schedule_user_types", "idx_schedule_user_types_start"),
    ("coverage_codes", "idx_coverage_codes_code"),
];

/// What one table looks like after the migrations ran.
#[derive(Debug, Default)]
struct TableShape {
    has_primary_key: bool,
    /// `(column, referenced table)`
    foreign_keys: BTreeSet<(String, String)>,
    unique_indexes: BTreeSet<String>,
}

#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct ColumnRow {
    #[diesel(sql_type = Integer)]
    pk: i32,
}

#[derive(QueryableByName)]
struct ForeignKeyRow {
    #[diesel(sql_type = Text)]
    table: String,
    #[diesel(sql_type = Text)]
    from: String,
}

#[derive(QueryableByName)]
struct IndexRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Integer)]
    unique: i32,
}

fn verify_migrations() -> Result<()> {
    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to open an in-memory SQLite database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys")?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;
    tracing::info!(count = applied.len(), "Applied migrations");

    let tables: BTreeMap<String, TableShape> = read_tables(&mut conn)?;
    let problems: Vec<String> = schema_problems(&tables);
    if !problems.is_empty() {
        for problem in &problems {
            tracing::error!(problem = problem.as_str(), "Schema mismatch");
        }
        return Err(eyre!("Schema verification found {} problem(s)", problems.len()));
    }

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert migrations: {e}"))?;
    let leftover: Vec<String> = read_tables(&mut conn)?.into_keys().collect();
    if !leftover.is_empty() {
        return Err(eyre!("Down migrations left tables behind: {leftover:?}"));
    }

    tracing::info!(tables = tables.len(), "Schema verification passed");
    Ok(())
}

fn schema_problems(tables: &BTreeMap<String, TableShape>) -> Vec<String> {
    let mut problems: Vec<String> = Vec::new();

    for table in EXPECTED_TABLES {
        match tables.get(table) {
            None => problems.push(format!("missing table {table}")),
            Some(shape) if !shape.has_primary_key => {
                problems.push(format!("{table} has no primary key"));
            }
            Some(_) => {}
        }
    }
    problems.extend(
        tables
            .keys()
            .filter(|name| !EXPECTED_TABLES.contains(&name.as_str()))
            .map(|name| format!("unexpected table {name}")),
    );

    for (table, column, target) in EXPECTED_FOREIGN_KEYS {
        let linked: bool = tables.get(table).is_some_and(|shape| {
            shape
                .foreign_keys
                .contains(&(column.to_string(), target.to_string()))
        });
        if !linked {
            problems.push(format!("missing foreign key {table}.{column} -> {target}"));
        }
    }

    for (table, index) in EXPECTED_UNIQUE_INDEXES {
        let present: bool = tables
            .get(table)
            .is_some_and(|shape| shape.unique_indexes.contains(index));
        if !present {
            problems.push(format!("missing unique index {index} on {table}"));
        }
    }

    problems
}

fn read_tables(conn: &mut SqliteConnection) -> Result<BTreeMap<String, TableShape>> {
    let names: Vec<NameRow> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations'",
    )
    .load(conn)
    .wrap_err("Failed to list tables")?;

    let mut tables: BTreeMap<String, TableShape> = BTreeMap::new();
    for NameRow { name } in names {
        let columns: Vec<ColumnRow> = diesel::sql_query(format!("PRAGMA table_info({name})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to read columns of {name}"))?;
        let foreign_keys: Vec<ForeignKeyRow> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({name})"))
                .load(conn)
                .wrap_err_with(|| format!("Failed to read foreign keys of {name}"))?;
        let indexes: Vec<IndexRow> = diesel::sql_query(format!("PRAGMA index_list({name})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to read indexes of {name}"))?;

        let shape = TableShape {
            has_primary_key: columns.iter().any(|column| column.pk > 0),
            foreign_keys: foreign_keys
                .into_iter()
                .map(|fk| (fk.from, fk.table))
                .collect(),
            unique_indexes: indexes
                .into_iter()
                .filter(|index| index.unique == 1)
                .map(|index| index.name)
                .collect(),
        };
        tracing::debug!(
            table = name.as_str(),
            foreign_keys = shape.foreign_keys.len(),
            unique_indexes = shape.unique_indexes.len(),
            "Read table"
        );
        tables.insert(name, shape);
    }
    Ok(tables)
}

/// Logs a `duct` expression before running it.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // Long output can push the command off screen.
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
