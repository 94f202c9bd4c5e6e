// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift queries.
//!
//! `employee_types` holds one denormalized row per shift mirroring the
//! version active today. `employee_type_versions` holds the full history.
//! A shift with no stored history is read as a single open version built
//! from its row.

use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftboard::{ShiftFields, ShiftRecord, ShiftVersion, TimelineVersion};
use shiftboard_domain::{EmployeeTypeId, OrderedEntry, PatternId, ScheduleId, StoreCapabilities};

use crate::diesel_schema::{employee_type_versions, employee_types};
use crate::error::PersistenceError;
use crate::queries::{from_db_date, from_db_optional_date};

/// Tie-break key for shift display order: `(name, id)`.
pub type ShiftOrderKey = (String, i64);

#[derive(Queryable, Selectable)]
#[diesel(table_name = employee_types)]
struct ShiftRow {
    employee_type_id: i64,
    name: String,
    pattern_id: Option<i64>,
    start_date: String,
    display_order: i64,
}

impl ShiftRow {
    fn into_record(self) -> Result<ShiftRecord, PersistenceError> {
        Ok(ShiftRecord {
            employee_type_id: EmployeeTypeId::new(self.employee_type_id),
            display_order: self.display_order,
            name: self.name,
            pattern_id: self.pattern_id.map(PatternId::new),
            start_date: from_db_date("employee_types", &self.start_date)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = employee_type_versions)]
struct VersionRow {
    employee_type_id: i64,
    name: String,
    pattern_id: Option<i64>,
    start_date: String,
    end_date: Option<String>,
}

impl VersionRow {
    fn into_version(self) -> Result<ShiftVersion, PersistenceError> {
        Ok(TimelineVersion::new(
            from_db_date("employee_type_versions", &self.start_date)?,
            from_db_optional_date("employee_type_versions", self.end_date.as_deref())?,
            ShiftFields::new(self.name, self.pattern_id.map(PatternId::new)),
        ))
    }
}

/// Lists active shifts ordered by display order, name, then id.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_shifts(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
) -> Result<Vec<ShiftRecord>, PersistenceError> {
    let rows: Vec<ShiftRow> = employee_types::table
        .filter(employee_types::schedule_id.eq(schedule_id.value()))
        .filter(employee_types::is_active.eq(1))
        .order((
            employee_types::display_order.asc(),
            employee_types::name.asc(),
            employee_types::employee_type_id.asc(),
        ))
        .select(ShiftRow::as_select())
        .load(conn)?;

    rows.into_iter().map(ShiftRow::into_record).collect()
}

/// Retrieves an active shift.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the shift does not exist or is inactive.
pub fn get_shift(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    employee_type_id: EmployeeTypeId,
) -> Result<Option<ShiftRecord>, PersistenceError> {
    let result: Result<ShiftRow, diesel::result::Error> = employee_types::table
        .filter(employee_types::schedule_id.eq(schedule_id.value()))
        .filter(employee_types::employee_type_id.eq(employee_type_id.value()))
        .filter(employee_types::is_active.eq(1))
        .select(ShiftRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_record().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// True if another active shift already uses `name` (case-insensitive).
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn shift_name_taken(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    name: &str,
    exclude: Option<EmployeeTypeId>,
) -> Result<bool, PersistenceError> {
    let rows: Vec<(i64, String)> = employee_types::table
        .filter(employee_types::schedule_id.eq(schedule_id.value()))
        .filter(employee_types::is_active.eq(1))
        .select((employee_types::employee_type_id, employee_types::name))
        .load(conn)?;

    let wanted: String = name.trim().to_lowercase();
    Ok(rows.iter().any(|(id, existing)| {
        exclude.is_none_or(|skip| skip.value() != *id) && existing.trim().to_lowercase() == wanted
    }))
}

/// Loads the stored version history of one shift, ordered by start date.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn load_stored_versions(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    employee_type_id: EmployeeTypeId,
) -> Result<Vec<ShiftVersion>, PersistenceError> {
    let rows: Vec<VersionRow> = employee_type_versions::table
        .filter(employee_type_versions::schedule_id.eq(schedule_id.value()))
        .filter(employee_type_versions::employee_type_id.eq(employee_type_id.value()))
        .filter(employee_type_versions::is_active.eq(1))
        .order(employee_type_versions::start_date.asc())
        .select(VersionRow::as_select())
        .load(conn)?;

    rows.into_iter().map(VersionRow::into_version).collect()
}

/// The effective timeline of one shift.
///
/// Without versioning support, or when no history is stored, the row is
/// returned as one open version.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn shift_timeline(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    shift: &ShiftRecord,
    capabilities: StoreCapabilities,
) -> Result<Vec<ShiftVersion>, PersistenceError> {
    if !capabilities.supports_shift_versioning {
        return Ok(vec![shift.as_open_version()]);
    }
    let versions: Vec<ShiftVersion> =
        load_stored_versions(conn, schedule_id, shift.employee_type_id)?;
    if versions.is_empty() {
        return Ok(vec![shift.as_open_version()]);
    }
    Ok(versions)
}

/// Effective timelines of every active shift, keyed by shift.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn all_shift_timelines(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    capabilities: StoreCapabilities,
) -> Result<BTreeMap<EmployeeTypeId, Vec<ShiftVersion>>, PersistenceError> {
    let shifts: Vec<ShiftRecord> = list_shifts(conn, schedule_id)?;
    let mut timelines: BTreeMap<EmployeeTypeId, Vec<ShiftVersion>> = BTreeMap::new();
    if capabilities.supports_shift_versioning {
        let rows: Vec<VersionRow> = employee_type_versions::table
            .filter(employee_type_versions::schedule_id.eq(schedule_id.value()))
            .filter(employee_type_versions::is_active.eq(1))
            .order((
                employee_type_versions::employee_type_id.asc(),
                employee_type_versions::start_date.asc(),
            ))
            .select(VersionRow::as_select())
            .load(conn)?;
        for row in rows {
            let employee_type_id: EmployeeTypeId = EmployeeTypeId::new(row.employee_type_id);
            timelines
                .entry(employee_type_id)
                .or_default()
                .push(row.into_version()?);
        }
    }

    Ok(shifts
        .iter()
        .map(|shift| {
            let versions: Vec<ShiftVersion> = timelines
                .remove(&shift.employee_type_id)
                .unwrap_or_else(|| vec![shift.as_open_version()]);
            (shift.employee_type_id, versions)
        })
        .collect())
}

/// Display order entries of every active shift.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn shift_order(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
) -> Result<Vec<OrderedEntry<ShiftOrderKey>>, PersistenceError> {
    let rows: Vec<(i64, String, i64)> = employee_types::table
        .filter(employee_types::schedule_id.eq(schedule_id.value()))
        .filter(employee_types::is_active.eq(1))
        .select((
            employee_types::employee_type_id,
            employee_types::name,
            employee_types::display_order,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, name, order)| OrderedEntry::new((name, id), order))
        .collect())
}
