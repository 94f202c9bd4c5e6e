// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule and membership mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftboard_domain::{ScheduleId, ScheduleRole, UserOid};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::MemberData;
use crate::diesel_schema::{schedule_users, schedules};
use crate::error::PersistenceError;
use crate::queries::flag;
use crate::queries::schedules::{count_active_managers, get_member};

/// Message returned when a change would leave a schedule without a Manager.
pub const LAST_MANAGER_MESSAGE: &str = "At least one Manager is required for the schedule";

/// Creates a schedule.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_schedule(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<ScheduleId, PersistenceError> {
    diesel::insert_into(schedules::table)
        .values(schedules::name.eq(name))
        .execute(conn)?;

    let schedule_id: i64 = get_last_insert_rowid(conn)?;
    info!(schedule_id, name, "Created schedule");
    Ok(ScheduleId::new(schedule_id))
}

/// Adds a member, or reactivates and updates an existing row.
///
/// # Errors
///
/// Returns an error if a write fails.
pub fn upsert_member(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    user_oid: &UserOid,
    display_name: Option<&str>,
    role: ScheduleRole,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let existing: Option<MemberData> = get_member(conn, schedule_id, user_oid)?;
        if let Some(member) = existing.as_ref().filter(|m| m.is_active)
            && role != ScheduleRole::Manager
        {
            guard_last_manager(conn, schedule_id, member)?;
        }
        if existing.is_some() {
            diesel::update(schedule_users::table)
                .filter(schedule_users::schedule_id.eq(schedule_id.value()))
                .filter(schedule_users::user_oid.eq(user_oid.as_str()))
                .set((
                    schedule_users::display_name.eq(display_name),
                    schedule_users::role_name.eq(role.as_str()),
                    schedule_users::is_active.eq(flag(true)),
                ))
                .execute(conn)?;
        } else {
            diesel::insert_into(schedule_users::table)
                .values((
                    schedule_users::schedule_id.eq(schedule_id.value()),
                    schedule_users::user_oid.eq(user_oid.as_str()),
                    schedule_users::display_name.eq(display_name),
                    schedule_users::role_name.eq(role.as_str()),
                ))
                .execute(conn)?;
        }
        info!(
            schedule_id = schedule_id.value(),
            user_oid = %user_oid,
            role = role.as_str(),
            "Upserted schedule member"
        );
        Ok(())
    })
}

fn require_active_member(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    user_oid: &UserOid,
) -> Result<MemberData, PersistenceError> {
    get_member(conn, schedule_id, user_oid)?
        .filter(|m| m.is_active)
        .ok_or_else(|| PersistenceError::NotFound(format!("Member {user_oid}")))
}

fn guard_last_manager(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    member: &MemberData,
) -> Result<(), PersistenceError> {
    if member.role == ScheduleRole::Manager && count_active_managers(conn, schedule_id)? <= 1 {
        return Err(PersistenceError::Conflict(LAST_MANAGER_MESSAGE.to_string()));
    }
    Ok(())
}

/// Changes the role of an active member.
///
/// # Errors
///
/// Returns `NotFound` for non-members and `Conflict` when the last Manager
/// would be demoted.
pub fn set_member_role(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    user_oid: &UserOid,
    role: ScheduleRole,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let member: MemberData = require_active_member(conn, schedule_id, user_oid)?;
        if role != ScheduleRole::Manager {
            guard_last_manager(conn, schedule_id, &member)?;
        }
        diesel::update(schedule_users::table)
            .filter(schedule_users::schedule_id.eq(schedule_id.value()))
            .filter(schedule_users::user_oid.eq(user_oid.as_str()))
            .set(schedule_users::role_name.eq(role.as_str()))
            .execute(conn)?;
        info!(
            schedule_id = schedule_id.value(),
            user_oid = %user_oid,
            from = member.role.as_str(),
            to = role.as_str(),
            "Changed member role"
        );
        Ok(())
    })
}

/// Sets or clears a member's display name.
///
/// # Errors
///
/// Returns `NotFound` for non-members.
pub fn set_display_name(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    user_oid: &UserOid,
    display_name: Option<&str>,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(schedule_users::table)
        .filter(schedule_users::schedule_id.eq(schedule_id.value()))
        .filter(schedule_users::user_oid.eq(user_oid.as_str()))
        .filter(schedule_users::is_active.eq(1))
        .set(schedule_users::display_name.eq(display_name))
        .execute(conn)?;
    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("Member {user_oid}")));
    }
    Ok(())
}

/// Marks a member inactive. Their history stays in place.
///
/// # Errors
///
/// Returns `NotFound` for non-members and `Conflict` when removing the
/// last Manager.
pub fn deactivate_member(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    user_oid: &UserOid,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let member: MemberData = require_active_member(conn, schedule_id, user_oid)?;
        guard_last_manager(conn, schedule_id, &member)?;
        diesel::update(schedule_users::table)
            .filter(schedule_users::schedule_id.eq(schedule_id.value()))
            .filter(schedule_users::user_oid.eq(user_oid.as_str()))
            .set(schedule_users::is_active.eq(flag(false)))
            .execute(conn)?;
        info!(
            schedule_id = schedule_id.value(),
            user_oid = %user_oid,
            "Deactivated schedule member"
        );
        Ok(())
    })
}
