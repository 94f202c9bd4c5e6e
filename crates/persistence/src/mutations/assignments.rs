// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftboard::{
    AssignmentFields, AssignmentVersion, TimelinePlan, TimelineStep, plan_change,
    validate_timeline,
};
use shiftboard_domain::{
    EmployeeTypeId, OrderedEntry, ScheduleId, UserOid, changed_entries, plan_insert, plan_move,
    renormalize, resolve_insert_position, resolve_move_position,
};
use time::Date;
use tracing::{debug, info};

use crate::data_models::AssignmentChange;
use crate::diesel_schema::schedule_user_types;
use crate::error::PersistenceError;
use crate::queries::assignments::{AssignmentOrderKey, assignment_order, user_timeline};
use crate::queries::schedules::get_member;
use crate::queries::shifts::get_shift;
use crate::queries::to_db_date;

/// Places a user in a shift effective on `change.start_date`.
///
/// Inside one transaction the target shift's display order is renormalized,
/// room is made at the requested position (a version overwritten in place
/// keeps its slot by default), and the user's timeline gets the
/// change: the version containing the start date is closed the day before,
/// a version starting on the same day is overwritten, and the new version
/// ends the day before the next later one. A shift that loses an
/// overwritten version is renormalized afterwards.
///
/// Returns the user's resulting timeline.
///
/// # Errors
///
/// Returns `NotFound` if the user is not an active member or the shift does
/// not exist, `DomainViolation` for an out-of-range position,
/// `TimelineViolation` if the result would overlap, or a database error.
/// Nothing is written on error.
pub fn upsert_assignment(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    change: &AssignmentChange,
    actor: Option<&str>,
) -> Result<Vec<AssignmentVersion>, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let member_active: bool = get_member(conn, schedule_id, &change.user_oid)?
            .is_some_and(|member| member.is_active);
        if !member_active {
            return Err(PersistenceError::NotFound(format!(
                "Member {} of schedule {schedule_id}",
                change.user_oid
            )));
        }
        if get_shift(conn, schedule_id, change.employee_type_id)?.is_none() {
            return Err(PersistenceError::NotFound(format!(
                "Shift {}",
                change.employee_type_id
            )));
        }

        let versions: Vec<AssignmentVersion> =
            user_timeline(conn, schedule_id, &change.user_oid)?;
        let replaced_shift: Option<EmployeeTypeId> = versions
            .iter()
            .find(|version| version.start_date == change.start_date)
            .map(|version| version.fields.employee_type_id);

        let dense: Vec<OrderedEntry<AssignmentOrderKey>> =
            normalize_assignment_order(conn, schedule_id, change.employee_type_id)?;
        let own_key: AssignmentOrderKey = (
            String::from(change.user_oid.as_str()),
            to_db_date(change.start_date)?,
        );
        let current: Option<i64> = dense
            .iter()
            .find(|entry| entry.key == own_key)
            .map(|entry| entry.display_order);
        // A row overwritten in place keeps its slot unless a new one is asked for.
        let (target, reorder): (i64, Vec<OrderedEntry<AssignmentOrderKey>>) = match current {
            Some(current) => {
                let target: i64 =
                    resolve_move_position(dense.len(), current, change.display_order)?;
                (target, plan_move(&dense, &own_key, target))
            }
            None => {
                let target: i64 = resolve_insert_position(dense.len(), change.display_order)?;
                (target, plan_insert(&dense, target))
            }
        };
        write_assignment_order(conn, schedule_id, change.employee_type_id, &reorder)?;

        let plan: TimelinePlan<AssignmentFields> = plan_change(
            &versions,
            change.start_date,
            AssignmentFields::new(change.employee_type_id, target),
        )?;
        for step in &plan.steps {
            execute_step(conn, schedule_id, &change.user_oid, step, actor)?;
        }

        if let Some(previous) = replaced_shift.filter(|id| *id != change.employee_type_id) {
            normalize_assignment_order(conn, schedule_id, previous)?;
        }

        let result: Vec<AssignmentVersion> = user_timeline(conn, schedule_id, &change.user_oid)?;
        validate_timeline(&result)?;

        info!(
            schedule_id = schedule_id.value(),
            user_oid = %change.user_oid,
            employee_type_id = change.employee_type_id.value(),
            start_date = %change.start_date,
            display_order = target,
            "Upserted assignment"
        );
        Ok(result)
    })
}

fn missing_assignment(user_oid: &UserOid, start_date: Date) -> PersistenceError {
    PersistenceError::NotFound(format!("Assignment of {user_oid} starting {start_date}"))
}

/// Runs one planned step against the user's stored rows.
pub(crate) fn execute_step(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    user_oid: &UserOid,
    step: &TimelineStep<AssignmentFields>,
    actor: Option<&str>,
) -> Result<(), PersistenceError> {
    match step {
        TimelineStep::Close {
            start_date,
            end_date,
        } => {
            let rows: usize = diesel::update(schedule_user_types::table)
                .filter(schedule_user_types::schedule_id.eq(schedule_id.value()))
                .filter(schedule_user_types::user_oid.eq(user_oid.as_str()))
                .filter(schedule_user_types::start_date.eq(to_db_date(*start_date)?))
                .filter(schedule_user_types::is_active.eq(1))
                .set(schedule_user_types::end_date.eq(Some(to_db_date(*end_date)?)))
                .execute(conn)?;
            if rows == 0 {
                return Err(missing_assignment(user_oid, *start_date));
            }
            debug!(user_oid = %user_oid, start_date = %start_date, "Closed containing assignment");
        }
        TimelineStep::Overwrite {
            start_date,
            end_date,
            fields,
        } => {
            let end: Option<String> = end_date.map(to_db_date).transpose()?;
            let rows: usize = diesel::update(schedule_user_types::table)
                .filter(schedule_user_types::schedule_id.eq(schedule_id.value()))
                .filter(schedule_user_types::user_oid.eq(user_oid.as_str()))
                .filter(schedule_user_types::start_date.eq(to_db_date(*start_date)?))
                .filter(schedule_user_types::is_active.eq(1))
                .set((
                    schedule_user_types::employee_type_id.eq(fields.employee_type_id.value()),
                    schedule_user_types::display_order.eq(fields.display_order),
                    schedule_user_types::end_date.eq(end),
                ))
                .execute(conn)?;
            if rows == 0 {
                return Err(missing_assignment(user_oid, *start_date));
            }
            debug!(user_oid = %user_oid, start_date = %start_date, "Overwrote assignment");
        }
        TimelineStep::Insert {
            start_date,
            end_date,
            fields,
        } => {
            let end: Option<String> = end_date.map(to_db_date).transpose()?;
            diesel::insert_into(schedule_user_types::table)
                .values((
                    schedule_user_types::schedule_id.eq(schedule_id.value()),
                    schedule_user_types::user_oid.eq(user_oid.as_str()),
                    schedule_user_types::employee_type_id.eq(fields.employee_type_id.value()),
                    schedule_user_types::display_order.eq(fields.display_order),
                    schedule_user_types::start_date.eq(to_db_date(*start_date)?),
                    schedule_user_types::end_date.eq(end),
                    schedule_user_types::created_by.eq(actor),
                ))
                .execute(conn)?;
            debug!(user_oid = %user_oid, start_date = %start_date, "Inserted assignment");
        }
    }
    Ok(())
}

/// Rewrites drifted orders within one shift to `1..=N`.
fn normalize_assignment_order(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    employee_type_id: EmployeeTypeId,
) -> Result<Vec<OrderedEntry<AssignmentOrderKey>>, PersistenceError> {
    let stored: Vec<OrderedEntry<AssignmentOrderKey>> =
        assignment_order(conn, schedule_id, employee_type_id)?;
    let dense: Vec<OrderedEntry<AssignmentOrderKey>> = renormalize(&stored);
    write_assignment_order(
        conn,
        schedule_id,
        employee_type_id,
        &changed_entries(&stored, &dense),
    )?;
    Ok(dense)
}

fn write_assignment_order(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    employee_type_id: EmployeeTypeId,
    entries: &[OrderedEntry<AssignmentOrderKey>],
) -> Result<(), PersistenceError> {
    for entry in entries {
        let (user_oid, start_date) = &entry.key;
        diesel::update(schedule_user_types::table)
            .filter(schedule_user_types::schedule_id.eq(schedule_id.value()))
            .filter(schedule_user_types::employee_type_id.eq(employee_type_id.value()))
            .filter(schedule_user_types::user_oid.eq(user_oid))
            .filter(schedule_user_types::start_date.eq(start_date))
            .filter(schedule_user_types::is_active.eq(1))
            .set(schedule_user_types::display_order.eq(entry.display_order))
            .execute(conn)?;
    }
    Ok(())
}
