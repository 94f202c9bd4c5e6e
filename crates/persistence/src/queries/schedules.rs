// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule and membership queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftboard_domain::{ScheduleId, ScheduleRole, UserOid};
use tracing::debug;

use crate::data_models::{MemberData, ScheduleData};
use crate::diesel_schema::{schedule_users, schedules};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = schedules)]
struct ScheduleRow {
    schedule_id: i64,
    name: String,
    is_active: i32,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = schedule_users)]
struct MemberRow {
    user_oid: String,
    display_name: Option<String>,
    role_name: String,
    is_active: i32,
}

impl MemberRow {
    fn into_data(self) -> Result<MemberData, PersistenceError> {
        let corrupt = |detail: String| PersistenceError::CorruptRow {
            table: "schedule_users",
            detail,
        };
        Ok(MemberData {
            user_oid: UserOid::new(&self.user_oid).map_err(|e| corrupt(e.to_string()))?,
            display_name: self.display_name,
            role: ScheduleRole::parse(&self.role_name).map_err(|e| corrupt(e.to_string()))?,
            is_active: self.is_active != 0,
        })
    }
}

/// Retrieves a schedule by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the schedule does not exist.
pub fn get_schedule(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
) -> Result<Option<ScheduleData>, PersistenceError> {
    let result: Result<ScheduleRow, diesel::result::Error> = schedules::table
        .filter(schedules::schedule_id.eq(schedule_id.value()))
        .select(ScheduleRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(ScheduleData {
            schedule_id: ScheduleId::new(row.schedule_id),
            name: row.name,
            is_active: row.is_active != 0,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a member row, active or not.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn get_member(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    user_oid: &UserOid,
) -> Result<Option<MemberData>, PersistenceError> {
    let result: Result<MemberRow, diesel::result::Error> = schedule_users::table
        .filter(schedule_users::schedule_id.eq(schedule_id.value()))
        .filter(schedule_users::user_oid.eq(user_oid.as_str()))
        .select(MemberRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_data().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Returns the role of an active member, or `None` for non-members.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn member_role(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    user_oid: &UserOid,
) -> Result<Option<ScheduleRole>, PersistenceError> {
    debug!(schedule_id = schedule_id.value(), user_oid = %user_oid, "Resolving schedule role");
    Ok(get_member(conn, schedule_id, user_oid)?
        .filter(|m| m.is_active)
        .map(|m| m.role))
}

/// Lists every member row of a schedule, including inactive ones.
///
/// Ordered by object id.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_all_members(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
) -> Result<Vec<MemberData>, PersistenceError> {
    let rows: Vec<MemberRow> = schedule_users::table
        .filter(schedule_users::schedule_id.eq(schedule_id.value()))
        .order(schedule_users::user_oid.asc())
        .select(MemberRow::as_select())
        .load(conn)?;

    rows.into_iter().map(MemberRow::into_data).collect()
}

/// Lists active members ordered by display name (falling back to object id).
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_members(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
) -> Result<Vec<MemberData>, PersistenceError> {
    let mut members: Vec<MemberData> = list_all_members(conn, schedule_id)?
        .into_iter()
        .filter(|m| m.is_active)
        .collect();
    members.sort_by_cached_key(|m| {
        (
            m.display_name
                .as_deref()
                .unwrap_or_else(|| m.user_oid.as_str())
                .to_lowercase(),
            m.user_oid.clone(),
        )
    });
    Ok(members)
}

/// Counts active Managers of a schedule.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_active_managers(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
) -> Result<i64, PersistenceError> {
    use diesel::dsl::count_star;

    let count: i64 = schedule_users::table
        .filter(schedule_users::schedule_id.eq(schedule_id.value()))
        .filter(schedule_users::is_active.eq(1))
        .filter(schedule_users::role_name.eq(ScheduleRole::Manager.as_str()))
        .select(count_star())
        .first(conn)?;

    Ok(count)
}
