// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift mutations.
//!
//! A shift change runs in four steps inside one transaction:
//!
//! 1. Renormalize display order and move the shift to its target position
//! 2. Plan the timeline change effective on the requested date
//! 3. Execute the plan's close, overwrite and insert steps
//! 4. Re-read the timeline, verify it and refresh the `employee_types` row
//!
//! Without versioning support only the row is written.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftboard::{
    ShiftFields, ShiftRecord, ShiftVersion, TimelinePlan, TimelineStep, plan_change,
    projection_source, validate_timeline,
};
use shiftboard_domain::{
    EmployeeTypeId, OrderedEntry, PatternId, ScheduleId, StoreCapabilities, changed_entries,
    plan_insert, plan_move, renormalize, resolve_insert_position, resolve_move_position,
};
use time::Date;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewShift, ShiftChange};
use crate::diesel_schema::{employee_type_versions, employee_types};
use crate::error::PersistenceError;
use crate::mutations::now;
use crate::queries::patterns::get_pattern;
use crate::queries::shifts::{
    ShiftOrderKey, get_shift, load_stored_versions, shift_name_taken, shift_order,
};
use crate::queries::to_db_date;

/// Creates a shift at the requested display position.
///
/// # Errors
///
/// Returns `Conflict` for a duplicate name, `NotFound` for an unknown
/// pattern, `DomainViolation` for an out-of-range position, or a database
/// error. Nothing is written on error.
pub fn create_shift(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    new_shift: &NewShift,
    capabilities: StoreCapabilities,
    actor: Option<&str>,
) -> Result<ShiftRecord, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        ensure_shift_name_free(conn, schedule_id, &new_shift.name, None)?;
        ensure_pattern_active(conn, schedule_id, new_shift.pattern_id)?;

        let dense: Vec<OrderedEntry<ShiftOrderKey>> = normalize_shift_order(conn, schedule_id)?;
        let target: i64 = resolve_insert_position(dense.len(), new_shift.display_order)?;
        write_shift_order(conn, &plan_insert(&dense, target))?;

        diesel::insert_into(employee_types::table)
            .values((
                employee_types::schedule_id.eq(schedule_id.value()),
                employee_types::name.eq(&new_shift.name),
                employee_types::pattern_id.eq(new_shift.pattern_id.map(PatternId::value)),
                employee_types::start_date.eq(to_db_date(new_shift.start_date)?),
                employee_types::display_order.eq(target),
                employee_types::updated_by.eq(actor),
            ))
            .execute(conn)?;
        let employee_type_id: EmployeeTypeId = EmployeeTypeId::new(get_last_insert_rowid(conn)?);

        let record: ShiftRecord = ShiftRecord {
            employee_type_id,
            display_order: target,
            name: new_shift.name.clone(),
            pattern_id: new_shift.pattern_id,
            start_date: new_shift.start_date,
        };
        if capabilities.supports_shift_versioning {
            insert_version(conn, schedule_id, &record.as_open_version(), employee_type_id, actor)?;
        }

        info!(
            schedule_id = schedule_id.value(),
            employee_type_id = employee_type_id.value(),
            display_order = target,
            "Created shift"
        );
        Ok(record)
    })
}

/// Applies an effective-dated change to a shift.
///
/// # Errors
///
/// Returns `NotFound` for an unknown shift or pattern, `Conflict` for a
/// duplicate name, `DomainViolation` for an out-of-range position,
/// `TimelineViolation` if the resulting history would overlap, or a
/// database error. Nothing is written on error.
pub fn update_shift(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    change: &ShiftChange,
    capabilities: StoreCapabilities,
    today: Date,
    actor: Option<&str>,
) -> Result<ShiftRecord, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let mut shift: ShiftRecord = get_shift(conn, schedule_id, change.employee_type_id)?
            .ok_or_else(|| {
                PersistenceError::NotFound(format!("Shift {}", change.employee_type_id))
            })?;
        ensure_shift_name_free(conn, schedule_id, &change.name, Some(shift.employee_type_id))?;
        ensure_pattern_active(conn, schedule_id, change.pattern_id)?;

        let dense: Vec<OrderedEntry<ShiftOrderKey>> = normalize_shift_order(conn, schedule_id)?;
        let key: ShiftOrderKey = (shift.name.clone(), shift.employee_type_id.value());
        let current: i64 = dense
            .iter()
            .find(|entry| entry.key == key)
            .map_or(shift.display_order, |entry| entry.display_order);
        let target: i64 = resolve_move_position(dense.len(), current, change.display_order)?;
        write_shift_order(conn, &plan_move(&dense, &key, target))?;
        shift.display_order = target;

        let fields: ShiftFields = ShiftFields::new(change.name.clone(), change.pattern_id);
        if capabilities.supports_shift_versioning {
            let versions: Vec<ShiftVersion> = ensure_history(conn, schedule_id, &shift, actor)?;
            let plan: TimelinePlan<ShiftFields> =
                plan_change(&versions, change.effective_date, fields)?;
            apply_shift_plan(conn, schedule_id, &mut shift, &plan, capabilities, today, actor)?;
        } else {
            shift.name = fields.name;
            shift.pattern_id = fields.pattern_id;
            write_shift_row(conn, schedule_id, &shift, actor)?;
        }

        info!(
            schedule_id = schedule_id.value(),
            employee_type_id = shift.employee_type_id.value(),
            effective_date = %change.effective_date,
            "Updated shift"
        );
        Ok(shift)
    })
}

/// Executes a timeline plan for one shift and refreshes its row.
///
/// Must run inside a transaction. With versioning the stored history is
/// materialized first when missing, the steps are executed, and the
/// resulting timeline is verified before the row is refreshed from the
/// version active today. Without versioning the plan's final fields are
/// written to the row.
///
/// # Errors
///
/// Returns `TimelineViolation` if the result overlaps, or a database error.
pub(crate) fn apply_shift_plan(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    shift: &mut ShiftRecord,
    plan: &TimelinePlan<ShiftFields>,
    capabilities: StoreCapabilities,
    today: Date,
    actor: Option<&str>,
) -> Result<(), PersistenceError> {
    if !capabilities.supports_shift_versioning {
        if let Some(fields) = plan.steps.iter().rev().find_map(step_fields) {
            shift.name.clone_from(&fields.name);
            shift.pattern_id = fields.pattern_id;
        }
        return write_shift_row(conn, schedule_id, shift, actor);
    }

    ensure_history(conn, schedule_id, shift, actor)?;
    for step in &plan.steps {
        execute_step(conn, schedule_id, shift.employee_type_id, step, actor)?;
    }

    let versions: Vec<ShiftVersion> =
        load_stored_versions(conn, schedule_id, shift.employee_type_id)?;
    validate_timeline(&versions)?;
    if let Some(source) = projection_source(&versions, today) {
        shift.refresh_from(source);
    }
    write_shift_row(conn, schedule_id, shift, actor)
}

const fn step_fields(step: &TimelineStep<ShiftFields>) -> Option<&ShiftFields> {
    match step {
        TimelineStep::Close { .. } => None,
        TimelineStep::Overwrite { fields, .. } | TimelineStep::Insert { fields, .. } => {
            Some(fields)
        }
    }
}

fn execute_step(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    employee_type_id: EmployeeTypeId,
    step: &TimelineStep<ShiftFields>,
    actor: Option<&str>,
) -> Result<(), PersistenceError> {
    match step {
        TimelineStep::Close {
            start_date,
            end_date,
        } => {
            let rows: usize = diesel::update(employee_type_versions::table)
                .filter(employee_type_versions::schedule_id.eq(schedule_id.value()))
                .filter(employee_type_versions::employee_type_id.eq(employee_type_id.value()))
                .filter(employee_type_versions::start_date.eq(to_db_date(*start_date)?))
                .filter(employee_type_versions::is_active.eq(1))
                .set(employee_type_versions::end_date.eq(Some(to_db_date(*end_date)?)))
                .execute(conn)?;
            if rows == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Shift {employee_type_id} version starting {start_date}"
                )));
            }
            debug!(
                employee_type_id = employee_type_id.value(),
                start_date = %start_date,
                end_date = %end_date,
                "Closed containing shift version"
            );
        }
        TimelineStep::Overwrite {
            start_date,
            end_date,
            fields,
        } => {
            let end: Option<String> = end_date.map(to_db_date).transpose()?;
            let rows: usize = diesel::update(employee_type_versions::table)
                .filter(employee_type_versions::schedule_id.eq(schedule_id.value()))
                .filter(employee_type_versions::employee_type_id.eq(employee_type_id.value()))
                .filter(employee_type_versions::start_date.eq(to_db_date(*start_date)?))
                .filter(employee_type_versions::is_active.eq(1))
                .set((
                    employee_type_versions::name.eq(&fields.name),
                    employee_type_versions::pattern_id.eq(fields.pattern_id.map(PatternId::value)),
                    employee_type_versions::end_date.eq(end),
                ))
                .execute(conn)?;
            if rows == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Shift {employee_type_id} version starting {start_date}"
                )));
            }
            debug!(
                employee_type_id = employee_type_id.value(),
                start_date = %start_date,
                "Overwrote shift version"
            );
        }
        TimelineStep::Insert {
            start_date,
            end_date,
            fields,
        } => {
            let version: ShiftVersion =
                ShiftVersion::new(*start_date, *end_date, fields.clone());
            insert_version(conn, schedule_id, &version, employee_type_id, actor)?;
            debug!(
                employee_type_id = employee_type_id.value(),
                start_date = %start_date,
                "Inserted shift version"
            );
        }
    }
    Ok(())
}

fn insert_version(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    version: &ShiftVersion,
    employee_type_id: EmployeeTypeId,
    actor: Option<&str>,
) -> Result<(), PersistenceError> {
    let end: Option<String> = version.end_date.map(to_db_date).transpose()?;
    diesel::insert_into(employee_type_versions::table)
        .values((
            employee_type_versions::schedule_id.eq(schedule_id.value()),
            employee_type_versions::employee_type_id.eq(employee_type_id.value()),
            employee_type_versions::name.eq(&version.fields.name),
            employee_type_versions::pattern_id.eq(version.fields.pattern_id.map(PatternId::value)),
            employee_type_versions::start_date.eq(to_db_date(version.start_date)?),
            employee_type_versions::end_date.eq(end),
            employee_type_versions::created_by.eq(actor),
        ))
        .execute(conn)?;
    Ok(())
}

/// Returns the stored history, first writing the row as a baseline version
/// when the shift has none yet.
fn ensure_history(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    shift: &ShiftRecord,
    actor: Option<&str>,
) -> Result<Vec<ShiftVersion>, PersistenceError> {
    let versions: Vec<ShiftVersion> =
        load_stored_versions(conn, schedule_id, shift.employee_type_id)?;
    if !versions.is_empty() {
        return Ok(versions);
    }
    let baseline: ShiftVersion = shift.as_open_version();
    insert_version(conn, schedule_id, &baseline, shift.employee_type_id, actor)?;
    debug!(
        employee_type_id = shift.employee_type_id.value(),
        "Materialized baseline shift version"
    );
    Ok(vec![baseline])
}

fn write_shift_row(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    shift: &ShiftRecord,
    actor: Option<&str>,
) -> Result<(), PersistenceError> {
    diesel::update(employee_types::table)
        .filter(employee_types::schedule_id.eq(schedule_id.value()))
        .filter(employee_types::employee_type_id.eq(shift.employee_type_id.value()))
        .set((
            employee_types::name.eq(&shift.name),
            employee_types::pattern_id.eq(shift.pattern_id.map(PatternId::value)),
            employee_types::start_date.eq(to_db_date(shift.start_date)?),
            employee_types::display_order.eq(shift.display_order),
            employee_types::updated_by.eq(actor),
            employee_types::updated_at.eq(now()),
        ))
        .execute(conn)?;
    Ok(())
}

/// Rewrites drifted orders to `1..=N` and returns the dense list.
fn normalize_shift_order(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
) -> Result<Vec<OrderedEntry<ShiftOrderKey>>, PersistenceError> {
    let stored: Vec<OrderedEntry<ShiftOrderKey>> = shift_order(conn, schedule_id)?;
    let dense: Vec<OrderedEntry<ShiftOrderKey>> = renormalize(&stored);
    write_shift_order(conn, &changed_entries(&stored, &dense))?;
    Ok(dense)
}

fn write_shift_order(
    conn: &mut SqliteConnection,
    entries: &[OrderedEntry<ShiftOrderKey>],
) -> Result<(), PersistenceError> {
    for entry in entries {
        diesel::update(employee_types::table)
            .filter(employee_types::employee_type_id.eq(entry.key.1))
            .set(employee_types::display_order.eq(entry.display_order))
            .execute(conn)?;
    }
    Ok(())
}

fn ensure_shift_name_free(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    name: &str,
    exclude: Option<EmployeeTypeId>,
) -> Result<(), PersistenceError> {
    if shift_name_taken(conn, schedule_id, name, exclude)? {
        return Err(PersistenceError::Conflict(format!(
            "A shift named '{name}' already exists"
        )));
    }
    Ok(())
}

fn ensure_pattern_active(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    pattern_id: Option<PatternId>,
) -> Result<(), PersistenceError> {
    if let Some(pattern_id) = pattern_id
        && get_pattern(conn, schedule_id, pattern_id)?.is_none()
    {
        return Err(PersistenceError::NotFound(format!("Pattern {pattern_id}")));
    }
    Ok(())
}
