// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment history queries.
//!
//! Every user has one timeline in `schedule_user_types`; each row places
//! the user in one shift at a position within that shift.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftboard::{AssignmentFields, AssignmentRecord, AssignmentVersion, TimelineVersion};
use shiftboard_domain::{EmployeeTypeId, OrderedEntry, ScheduleId, UserOid};
use time::Date;

use crate::diesel_schema::schedule_user_types;
use crate::error::PersistenceError;
use crate::queries::{from_db_date, from_db_optional_date, to_db_date};

/// Tie-break key for assignment display order within a shift: `(user, start)`.
pub type AssignmentOrderKey = (String, String);

#[derive(Queryable, Selectable)]
#[diesel(table_name = schedule_user_types)]
struct AssignmentRow {
    user_oid: String,
    employee_type_id: i64,
    display_order: i64,
    start_date: String,
    end_date: Option<String>,
}

impl AssignmentRow {
    fn into_record(self) -> Result<AssignmentRecord, PersistenceError> {
        let user_oid: UserOid =
            UserOid::new(&self.user_oid).map_err(|e| PersistenceError::CorruptRow {
                table: "schedule_user_types",
                detail: e.to_string(),
            })?;
        Ok(AssignmentRecord::new(
            user_oid,
            TimelineVersion::new(
                from_db_date("schedule_user_types", &self.start_date)?,
                from_db_optional_date("schedule_user_types", self.end_date.as_deref())?,
                AssignmentFields::new(
                    EmployeeTypeId::new(self.employee_type_id),
                    self.display_order,
                ),
            ),
        ))
    }
}

/// Loads one user's assignment timeline ordered by start date.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn user_timeline(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    user_oid: &UserOid,
) -> Result<Vec<AssignmentVersion>, PersistenceError> {
    let rows: Vec<AssignmentRow> = schedule_user_types::table
        .filter(schedule_user_types::schedule_id.eq(schedule_id.value()))
        .filter(schedule_user_types::user_oid.eq(user_oid.as_str()))
        .filter(schedule_user_types::is_active.eq(1))
        .order(schedule_user_types::start_date.asc())
        .select(AssignmentRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| row.into_record().map(|record| record.version))
        .collect()
}

/// Lists assignments in effect on `as_of`.
///
/// Ordered by display order, user, shift, then start date.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn assignments_on(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    as_of: Date,
) -> Result<Vec<AssignmentRecord>, PersistenceError> {
    let day: String = to_db_date(as_of)?;
    let rows: Vec<AssignmentRow> = schedule_user_types::table
        .filter(schedule_user_types::schedule_id.eq(schedule_id.value()))
        .filter(schedule_user_types::is_active.eq(1))
        .filter(schedule_user_types::start_date.le(day.as_str()))
        .filter(
            schedule_user_types::end_date
                .is_null()
                .or(schedule_user_types::end_date.ge(day.as_str())),
        )
        .order((
            schedule_user_types::display_order.asc(),
            schedule_user_types::user_oid.asc(),
            schedule_user_types::employee_type_id.asc(),
            schedule_user_types::start_date.asc(),
        ))
        .select(AssignmentRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AssignmentRow::into_record).collect()
}

/// Lists assignments intersecting `[start, end]`.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn assignments_between(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    start: Date,
    end: Date,
) -> Result<Vec<AssignmentRecord>, PersistenceError> {
    let first: String = to_db_date(start)?;
    let last: String = to_db_date(end)?;
    let rows: Vec<AssignmentRow> = schedule_user_types::table
        .filter(schedule_user_types::schedule_id.eq(schedule_id.value()))
        .filter(schedule_user_types::is_active.eq(1))
        .filter(schedule_user_types::start_date.le(last.as_str()))
        .filter(
            schedule_user_types::end_date
                .is_null()
                .or(schedule_user_types::end_date.ge(first.as_str())),
        )
        .select(AssignmentRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AssignmentRow::into_record).collect()
}

/// Display order entries of every assignment row in one shift.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn assignment_order(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    employee_type_id: EmployeeTypeId,
) -> Result<Vec<OrderedEntry<AssignmentOrderKey>>, PersistenceError> {
    let rows: Vec<(String, String, i64)> = schedule_user_types::table
        .filter(schedule_user_types::schedule_id.eq(schedule_id.value()))
        .filter(schedule_user_types::employee_type_id.eq(employee_type_id.value()))
        .filter(schedule_user_types::is_active.eq(1))
        .select((
            schedule_user_types::user_oid,
            schedule_user_types::start_date,
            schedule_user_types::display_order,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(user_oid, start_date, order)| OrderedEntry::new((user_oid, start_date), order))
        .collect())
}
