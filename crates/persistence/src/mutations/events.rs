// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Coverage code and event mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftboard_domain::{
    CoverageCodeId, EmployeeTypeId, EventId, ScheduleId, StoreCapabilities,
};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{CoverageCodeWrite, CustomEventStyle, EventWrite};
use crate::diesel_schema::{coverage_codes, schedule_events};
use crate::error::PersistenceError;
use crate::queries::events::{coverage_code_taken, get_coverage_code};
use crate::queries::flag;
use crate::queries::schedules::get_member;
use crate::queries::shifts::get_shift;
use crate::queries::to_db_date;

fn ensure_code_free(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    code: &str,
    exclude: Option<CoverageCodeId>,
) -> Result<(), PersistenceError> {
    if coverage_code_taken(conn, schedule_id, code, exclude)? {
        return Err(PersistenceError::Conflict(format!(
            "An event code '{code}' already exists in this schedule"
        )));
    }
    Ok(())
}

/// Creates a coverage code at the end of the sort order.
///
/// # Errors
///
/// Returns `Conflict` if the code is already used, or a database error.
pub fn create_coverage_code(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    write: &CoverageCodeWrite,
    actor: Option<&str>,
) -> Result<CoverageCodeId, PersistenceError> {
    use diesel::dsl::count_star;

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        ensure_code_free(conn, schedule_id, &write.code, None)?;

        let existing: i64 = coverage_codes::table
            .filter(coverage_codes::schedule_id.eq(schedule_id.value()))
            .select(count_star())
            .first(conn)?;

        diesel::insert_into(coverage_codes::table)
            .values((
                coverage_codes::schedule_id.eq(schedule_id.value()),
                coverage_codes::code.eq(&write.code),
                coverage_codes::label.eq(&write.label),
                coverage_codes::display_mode.eq(write.display_mode.label()),
                coverage_codes::color.eq(write.color.as_str()),
                coverage_codes::sort_order.eq(existing + 1),
                coverage_codes::is_active.eq(flag(write.is_active)),
                coverage_codes::created_by.eq(actor),
            ))
            .execute(conn)?;
        let coverage_code_id: i64 = get_last_insert_rowid(conn)?;

        info!(
            schedule_id = schedule_id.value(),
            coverage_code_id,
            code = %write.code,
            "Created coverage code"
        );
        Ok(CoverageCodeId::new(coverage_code_id))
    })
}

/// Replaces every editable field of a coverage code.
///
/// # Errors
///
/// Returns `NotFound` for unknown codes, `Conflict` if another code already
/// uses the new code, or a database error.
pub fn update_coverage_code(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    coverage_code_id: CoverageCodeId,
    write: &CoverageCodeWrite,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        if get_coverage_code(conn, schedule_id, coverage_code_id)?.is_none() {
            return Err(PersistenceError::NotFound(format!(
                "Event code {coverage_code_id}"
            )));
        }
        ensure_code_free(conn, schedule_id, &write.code, Some(coverage_code_id))?;

        diesel::update(coverage_codes::table)
            .filter(coverage_codes::coverage_code_id.eq(coverage_code_id.value()))
            .set((
                coverage_codes::code.eq(&write.code),
                coverage_codes::label.eq(&write.label),
                coverage_codes::display_mode.eq(write.display_mode.label()),
                coverage_codes::color.eq(write.color.as_str()),
                coverage_codes::is_active.eq(flag(write.is_active)),
            ))
            .execute(conn)?;

        info!(
            schedule_id = schedule_id.value(),
            coverage_code_id = coverage_code_id.value(),
            is_active = write.is_active,
            "Updated coverage code"
        );
        Ok(())
    })
}

/// Checks that every entity an event points at is still usable.
fn ensure_event_references(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    write: &EventWrite,
) -> Result<(), PersistenceError> {
    if let Some(employee_type_id) = write.employee_type_id
        && get_shift(conn, schedule_id, employee_type_id)?.is_none()
    {
        return Err(PersistenceError::NotFound(format!("Shift {employee_type_id}")));
    }
    if let Some(user_oid) = &write.user_oid {
        let active: bool =
            get_member(conn, schedule_id, user_oid)?.is_some_and(|member| member.is_active);
        if !active {
            return Err(PersistenceError::NotFound(format!(
                "Member {user_oid} of schedule {schedule_id}"
            )));
        }
    }
    if let Some(coverage_code_id) = write.coverage_code_id {
        let active: bool = get_coverage_code(conn, schedule_id, coverage_code_id)?
            .is_some_and(|code| code.is_active);
        if !active {
            return Err(PersistenceError::NotFound(format!(
                "Event code {coverage_code_id}"
            )));
        }
    }
    Ok(())
}

/// Columns written for an event, with unsupported ones left empty.
struct EventColumns {
    employee_type_id: Option<i64>,
    user_oid: Option<String>,
    start_date: String,
    end_date: String,
    coverage_code_id: Option<i64>,
    custom_code: Option<String>,
    custom_name: Option<String>,
    custom_display_mode: Option<String>,
    custom_color: Option<String>,
    comments: Option<String>,
}

impl EventColumns {
    fn from_write(
        write: &EventWrite,
        capabilities: StoreCapabilities,
    ) -> Result<Self, PersistenceError> {
        let custom: Option<&CustomEventStyle> = write.custom.as_ref();
        let colors: bool = capabilities.supports_custom_event_colors;
        Ok(Self {
            employee_type_id: write
                .employee_type_id
                .filter(|_| capabilities.supports_event_scoping)
                .map(EmployeeTypeId::value),
            user_oid: write.user_oid.as_ref().map(|oid| oid.as_str().to_string()),
            start_date: to_db_date(write.start_date)?,
            end_date: to_db_date(write.end_date)?,
            coverage_code_id: write.coverage_code_id.map(CoverageCodeId::value),
            custom_code: custom.map(|c| c.code.clone()),
            custom_name: custom.map(|c| c.name.clone()),
            custom_display_mode: custom
                .filter(|_| colors)
                .map(|c| c.display_mode.label().to_string()),
            custom_color: custom
                .filter(|_| colors)
                .map(|c| c.color.as_str().to_string()),
            comments: write.comments.clone(),
        })
    }
}

/// Creates an event.
///
/// Columns the store does not support are written empty: the shift scope
/// without event scoping, the custom display mode and colour without custom
/// colours.
///
/// # Errors
///
/// Returns `NotFound` if the shift, member or coverage code is missing or
/// inactive, or a database error.
pub fn create_event(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    write: &EventWrite,
    capabilities: StoreCapabilities,
    actor: Option<&str>,
) -> Result<EventId, PersistenceError> {
    let columns: EventColumns = EventColumns::from_write(write, capabilities)?;

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        ensure_event_references(conn, schedule_id, write)?;

        diesel::insert_into(schedule_events::table)
            .values((
                schedule_events::schedule_id.eq(schedule_id.value()),
                schedule_events::employee_type_id.eq(columns.employee_type_id),
                schedule_events::user_oid.eq(&columns.user_oid),
                schedule_events::start_date.eq(&columns.start_date),
                schedule_events::end_date.eq(&columns.end_date),
                schedule_events::coverage_code_id.eq(columns.coverage_code_id),
                schedule_events::custom_code.eq(&columns.custom_code),
                schedule_events::custom_name.eq(&columns.custom_name),
                schedule_events::custom_display_mode.eq(&columns.custom_display_mode),
                schedule_events::custom_color.eq(&columns.custom_color),
                schedule_events::comments.eq(&columns.comments),
                schedule_events::created_by.eq(actor),
            ))
            .execute(conn)?;
        let event_id: i64 = get_last_insert_rowid(conn)?;

        info!(
            schedule_id = schedule_id.value(),
            event_id,
            start_date = %write.start_date,
            end_date = %write.end_date,
            "Created event"
        );
        Ok(EventId::new(event_id))
    })
}

/// Replaces every field of an active event.
///
/// # Errors
///
/// Returns `NotFound` for unknown or removed events and for missing
/// references, or a database error.
pub fn update_event(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    event_id: EventId,
    write: &EventWrite,
    capabilities: StoreCapabilities,
) -> Result<(), PersistenceError> {
    let columns: EventColumns = EventColumns::from_write(write, capabilities)?;

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        ensure_event_references(conn, schedule_id, write)?;

        let rows: usize = diesel::update(schedule_events::table)
            .filter(schedule_events::schedule_id.eq(schedule_id.value()))
            .filter(schedule_events::event_id.eq(event_id.value()))
            .filter(schedule_events::is_active.eq(1))
            .set((
                schedule_events::employee_type_id.eq(columns.employee_type_id),
                schedule_events::user_oid.eq(&columns.user_oid),
                schedule_events::start_date.eq(&columns.start_date),
                schedule_events::end_date.eq(&columns.end_date),
                schedule_events::coverage_code_id.eq(columns.coverage_code_id),
                schedule_events::custom_code.eq(&columns.custom_code),
                schedule_events::custom_name.eq(&columns.custom_name),
                schedule_events::custom_display_mode.eq(&columns.custom_display_mode),
                schedule_events::custom_color.eq(&columns.custom_color),
                schedule_events::comments.eq(&columns.comments),
            ))
            .execute(conn)?;
        if rows == 0 {
            return Err(PersistenceError::NotFound(format!("Event {event_id}")));
        }

        info!(
            schedule_id = schedule_id.value(),
            event_id = event_id.value(),
            "Updated event"
        );
        Ok(())
    })
}

/// Removes an event from every view.
///
/// # Errors
///
/// Returns `NotFound` for unknown or already removed events, or a database
/// error.
pub fn delete_event(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    event_id: EventId,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(schedule_events::table)
        .filter(schedule_events::schedule_id.eq(schedule_id.value()))
        .filter(schedule_events::event_id.eq(event_id.value()))
        .filter(schedule_events::is_active.eq(1))
        .set(schedule_events::is_active.eq(flag(false)))
        .execute(conn)?;
    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("Event {event_id}")));
    }
    info!(
        schedule_id = schedule_id.value(),
        event_id = event_id.value(),
        "Deleted event"
    );
    Ok(())
}
