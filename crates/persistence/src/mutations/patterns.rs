// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pattern mutations and the removal cascade.

use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftboard::{RemovalDecision, ShiftRecord, ShiftVersion, plan_pattern_removal};
use shiftboard_domain::{EmployeeTypeId, PatternId, ScheduleId, StoreCapabilities};
use time::Date;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::PatternWrite;
use crate::diesel_schema::{employee_type_versions, employee_types, patterns};
use crate::error::PersistenceError;
use crate::mutations::now;
use crate::mutations::shifts::apply_shift_plan;
use crate::queries::flag;
use crate::queries::patterns::{get_pattern, pattern_name_taken};
use crate::queries::shifts::{all_shift_timelines, get_shift};

fn ensure_name_free(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    name: &str,
    exclude: Option<PatternId>,
) -> Result<(), PersistenceError> {
    if pattern_name_taken(conn, schedule_id, name, exclude)? {
        return Err(PersistenceError::Conflict(format!(
            "A pattern named '{name}' already exists"
        )));
    }
    Ok(())
}

/// Creates a pattern.
///
/// # Errors
///
/// Returns `Conflict` if an active pattern already uses the name, or a
/// database error.
pub fn create_pattern(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    write: &PatternWrite,
    actor: Option<&str>,
) -> Result<PatternId, PersistenceError> {
    let payload: String = serde_json::to_string(&write.pattern.to_payload())?;

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        ensure_name_free(conn, schedule_id, &write.name, None)?;

        diesel::insert_into(patterns::table)
            .values((
                patterns::schedule_id.eq(schedule_id.value()),
                patterns::name.eq(&write.name),
                patterns::summary.eq(&write.summary),
                patterns::pattern_json.eq(&payload),
                patterns::created_by.eq(actor),
            ))
            .execute(conn)?;
        let pattern_id: i64 = get_last_insert_rowid(conn)?;

        info!(
            schedule_id = schedule_id.value(),
            pattern_id,
            summary = %write.summary,
            "Created pattern"
        );
        Ok(PatternId::new(pattern_id))
    })
}

/// Replaces the name, summary and payload of an active pattern.
///
/// # Errors
///
/// Returns `NotFound` for unknown or removed patterns, `Conflict` for a
/// duplicate name, or a database error.
pub fn update_pattern(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    pattern_id: PatternId,
    write: &PatternWrite,
) -> Result<(), PersistenceError> {
    let payload: String = serde_json::to_string(&write.pattern.to_payload())?;

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        if get_pattern(conn, schedule_id, pattern_id)?.is_none() {
            return Err(PersistenceError::NotFound(format!("Pattern {pattern_id}")));
        }
        ensure_name_free(conn, schedule_id, &write.name, Some(pattern_id))?;

        diesel::update(patterns::table)
            .filter(patterns::pattern_id.eq(pattern_id.value()))
            .set((
                patterns::name.eq(&write.name),
                patterns::summary.eq(&write.summary),
                patterns::pattern_json.eq(&payload),
                patterns::updated_at.eq(now()),
            ))
            .execute(conn)?;

        info!(
            schedule_id = schedule_id.value(),
            pattern_id = pattern_id.value(),
            "Updated pattern"
        );
        Ok(())
    })
}

/// True if any shift row or version, active or not, points at the pattern.
fn referenced_anywhere(
    conn: &mut SqliteConnection,
    pattern_id: PatternId,
) -> Result<bool, PersistenceError> {
    use diesel::dsl::count_star;

    let rows: i64 = employee_types::table
        .filter(employee_types::pattern_id.eq(pattern_id.value()))
        .select(count_star())
        .first(conn)?;
    let versions: i64 = employee_type_versions::table
        .filter(employee_type_versions::pattern_id.eq(pattern_id.value()))
        .select(count_star())
        .first(conn)?;
    Ok(rows + versions > 0)
}

/// Removes a pattern, cascading to the shifts that use it today.
///
/// The decision is planned and executed in one transaction:
///
/// - unused anywhere: the row is deleted
/// - used today without `confirm_active_removal`: nothing is written and
///   `NeedsConfirmation` is returned
/// - otherwise every shift whose current version uses the pattern gets an
///   "unassigned" version effective `today`, then the pattern is marked
///   inactive so history keeps rendering
///
/// # Errors
///
/// Returns `NotFound` for unknown or removed patterns, a timeline error if
/// a cascade would leave overlapping versions, or a database error. Any
/// error rolls back every cascade step.
pub fn remove_pattern(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    pattern_id: PatternId,
    today: Date,
    confirm_active_removal: bool,
    capabilities: StoreCapabilities,
    actor: Option<&str>,
) -> Result<RemovalDecision, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        if get_pattern(conn, schedule_id, pattern_id)?.is_none() {
            return Err(PersistenceError::NotFound(format!("Pattern {pattern_id}")));
        }

        let timelines: BTreeMap<EmployeeTypeId, Vec<ShiftVersion>> =
            all_shift_timelines(conn, schedule_id, capabilities)?;
        let decision: RemovalDecision =
            plan_pattern_removal(pattern_id, &timelines, today, confirm_active_removal)?;

        let decision: RemovalDecision = match decision {
            RemovalDecision::NeedsConfirmation { .. } => return Ok(decision),
            RemovalDecision::HardDelete if !referenced_anywhere(conn, pattern_id)? => {
                diesel::delete(patterns::table)
                    .filter(patterns::pattern_id.eq(pattern_id.value()))
                    .execute(conn)?;
                decision
            }
            // Only inactive shifts still point at it; keep the row for them.
            RemovalDecision::HardDelete => RemovalDecision::SoftRemove {
                unassign: Vec::new(),
            },
            RemovalDecision::SoftRemove { ref unassign } => {
                for (employee_type_id, plan) in unassign {
                    let mut shift: ShiftRecord = get_shift(conn, schedule_id, *employee_type_id)?
                        .ok_or_else(|| {
                            PersistenceError::NotFound(format!("Shift {employee_type_id}"))
                        })?;
                    apply_shift_plan(conn, schedule_id, &mut shift, plan, capabilities, today, actor)?;
                }
                decision
            }
        };

        if matches!(decision, RemovalDecision::SoftRemove { .. }) {
            diesel::update(patterns::table)
                .filter(patterns::pattern_id.eq(pattern_id.value()))
                .set((
                    patterns::is_active.eq(flag(false)),
                    patterns::updated_at.eq(now()),
                ))
                .execute(conn)?;
        }

        match decision.mode() {
            Some(mode) => info!(
                schedule_id = schedule_id.value(),
                pattern_id = pattern_id.value(),
                mode = mode.as_str(),
                "Removed pattern"
            ),
            None => debug!(
                schedule_id = schedule_id.value(),
                pattern_id = pattern_id.value(),
                "Pattern removal needs confirmation"
            ),
        }
        Ok(decision)
    })
}
