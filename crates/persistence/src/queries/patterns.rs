// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rotation pattern queries.
//!
//! Stored payloads are parsed on read. A payload that fails to parse or
//! validate is returned as [`StoredPattern::Corrupt`] rather than an error.

use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftboard_domain::{PatternId, ScheduleId, StoredPattern};
use tracing::warn;

use crate::data_models::PatternData;
use crate::diesel_schema::patterns;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = patterns)]
struct PatternRow {
    pattern_id: i64,
    name: String,
    summary: String,
    pattern_json: String,
    is_active: i32,
    created_by: Option<String>,
}

impl From<PatternRow> for PatternData {
    fn from(row: PatternRow) -> Self {
        let pattern: StoredPattern = StoredPattern::parse(&row.pattern_json);
        if pattern == StoredPattern::Corrupt {
            warn!(pattern_id = row.pattern_id, "Stored pattern payload is corrupt");
        }
        Self {
            pattern_id: PatternId::new(row.pattern_id),
            name: row.name,
            summary: row.summary,
            pattern,
            is_active: row.is_active != 0,
            created_by: row.created_by,
        }
    }
}

/// Lists active patterns ordered by name (case-insensitive), then id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_patterns(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
) -> Result<Vec<PatternData>, PersistenceError> {
    let rows: Vec<PatternRow> = patterns::table
        .filter(patterns::schedule_id.eq(schedule_id.value()))
        .filter(patterns::is_active.eq(1))
        .order(patterns::pattern_id.asc())
        .select(PatternRow::as_select())
        .load(conn)?;

    let mut data: Vec<PatternData> = rows.into_iter().map(PatternData::from).collect();
    data.sort_by_cached_key(|p| (p.name.to_lowercase(), p.pattern_id));
    Ok(data)
}

/// Retrieves an active pattern.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the pattern does not exist or was removed.
pub fn get_pattern(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    pattern_id: PatternId,
) -> Result<Option<PatternData>, PersistenceError> {
    let result: Result<PatternRow, diesel::result::Error> = patterns::table
        .filter(patterns::schedule_id.eq(schedule_id.value()))
        .filter(patterns::pattern_id.eq(pattern_id.value()))
        .filter(patterns::is_active.eq(1))
        .select(PatternRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(PatternData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Loads every pattern of a schedule, removed ones included, keyed by id.
///
/// Removed patterns stay referenced by historical shift versions and are
/// still needed to render past months.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_pattern_payloads(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
) -> Result<BTreeMap<PatternId, StoredPattern>, PersistenceError> {
    let rows: Vec<PatternRow> = patterns::table
        .filter(patterns::schedule_id.eq(schedule_id.value()))
        .select(PatternRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(PatternData::from)
        .map(|p| (p.pattern_id, p.pattern))
        .collect())
}

/// True if another active pattern already uses `name` (case-insensitive).
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn pattern_name_taken(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    name: &str,
    exclude: Option<PatternId>,
) -> Result<bool, PersistenceError> {
    let rows: Vec<(i64, String)> = patterns::table
        .filter(patterns::schedule_id.eq(schedule_id.value()))
        .filter(patterns::is_active.eq(1))
        .select((patterns::pattern_id, patterns::name))
        .load(conn)?;

    let wanted: String = name.trim().to_lowercase();
    Ok(rows.iter().any(|(id, existing)| {
        exclude.is_none_or(|skip| skip.value() != *id) && existing.trim().to_lowercase() == wanted
    }))
}
