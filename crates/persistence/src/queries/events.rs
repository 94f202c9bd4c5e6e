// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Coverage code and event queries.

use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftboard::EventRecord;
use shiftboard_domain::{
    CoverageCodeId, DisplayMode, EmployeeTypeId, EventId, HexColor, ScheduleId, UserOid,
};
use time::Date;

use crate::data_models::{CoverageCodeData, EventData};
use crate::diesel_schema::{coverage_codes, schedule_events};
use crate::error::PersistenceError;
use crate::queries::{from_db_date, to_db_date};

#[derive(Queryable, Selectable)]
#[diesel(table_name = coverage_codes)]
struct CoverageCodeRow {
    coverage_code_id: i64,
    code: String,
    label: String,
    display_mode: String,
    color: String,
    sort_order: i64,
    is_active: i32,
}

impl From<CoverageCodeRow> for CoverageCodeData {
    fn from(row: CoverageCodeRow) -> Self {
        Self {
            coverage_code_id: CoverageCodeId::new(row.coverage_code_id),
            code: row.code,
            label: row.label,
            display_mode: DisplayMode::parse_or_default(Some(&row.display_mode)),
            color: HexColor::parse_or_default(Some(&row.color)),
            sort_order: row.sort_order,
            is_active: row.is_active != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = schedule_events)]
struct EventRow {
    event_id: i64,
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

impl EventRow {
    fn into_data(
        self,
        codes: &BTreeMap<CoverageCodeId, CoverageCodeData>,
    ) -> Result<EventData, PersistenceError> {
        let coverage_code_id: Option<CoverageCodeId> =
            self.coverage_code_id.map(CoverageCodeId::new);
        let code: Option<&CoverageCodeData> = coverage_code_id.and_then(|id| codes.get(&id));
        let record: EventRecord = EventRecord {
            event_id: EventId::new(self.event_id),
            employee_type_id: self.employee_type_id.map(EmployeeTypeId::new),
            user_oid: self.user_oid.as_deref().and_then(|oid| UserOid::new(oid).ok()),
            start_date: from_db_date("schedule_events", &self.start_date)?,
            end_date: from_db_date("schedule_events", &self.end_date)?,
            coverage_code_id,
            coverage_display_mode: code.map(|c| c.display_mode.label().to_string()),
            coverage_color: code.map(|c| c.color.to_string()),
            custom_display_mode: self.custom_display_mode,
            custom_color: self.custom_color,
        };
        Ok(EventData {
            record,
            code: code.map(|c| c.code.clone()).or(self.custom_code),
            name: code.map(|c| c.label.clone()).or(self.custom_name),
            comments: self.comments,
        })
    }
}

/// Lists coverage codes ordered by sort order, code, then id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_coverage_codes(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    include_inactive: bool,
) -> Result<Vec<CoverageCodeData>, PersistenceError> {
    let mut query = coverage_codes::table
        .filter(coverage_codes::schedule_id.eq(schedule_id.value()))
        .into_boxed();
    if !include_inactive {
        query = query.filter(coverage_codes::is_active.eq(1));
    }

    let rows: Vec<CoverageCodeRow> = query
        .order((
            coverage_codes::sort_order.asc(),
            coverage_codes::code.asc(),
            coverage_codes::coverage_code_id.asc(),
        ))
        .select(CoverageCodeRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(CoverageCodeData::from).collect())
}

/// Retrieves a coverage code, active or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_coverage_code(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    coverage_code_id: CoverageCodeId,
) -> Result<Option<CoverageCodeData>, PersistenceError> {
    let result: Result<CoverageCodeRow, diesel::result::Error> = coverage_codes::table
        .filter(coverage_codes::schedule_id.eq(schedule_id.value()))
        .filter(coverage_codes::coverage_code_id.eq(coverage_code_id.value()))
        .select(CoverageCodeRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(CoverageCodeData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// True if another coverage code of the schedule already uses `code`.
///
/// Codes are stored normalized, so the comparison is exact.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn coverage_code_taken(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    code: &str,
    exclude: Option<CoverageCodeId>,
) -> Result<bool, PersistenceError> {
    let ids: Vec<i64> = coverage_codes::table
        .filter(coverage_codes::schedule_id.eq(schedule_id.value()))
        .filter(coverage_codes::code.eq(code))
        .select(coverage_codes::coverage_code_id)
        .load(conn)?;

    Ok(ids
        .iter()
        .any(|id| exclude.is_none_or(|skip| skip.value() != *id)))
}

fn code_lookup(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
) -> Result<BTreeMap<CoverageCodeId, CoverageCodeData>, PersistenceError> {
    Ok(list_coverage_codes(conn, schedule_id, true)?
        .into_iter()
        .map(|code| (code.coverage_code_id, code))
        .collect())
}

/// Lists active events intersecting `[start, end]`.
///
/// Ordered by start date, end date, then id. Events keep the display
/// values of their coverage code even after the code is deactivated.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn events_between(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    start: Date,
    end: Date,
) -> Result<Vec<EventData>, PersistenceError> {
    let first: String = to_db_date(start)?;
    let last: String = to_db_date(end)?;
    let codes: BTreeMap<CoverageCodeId, CoverageCodeData> = code_lookup(conn, schedule_id)?;

    let rows: Vec<EventRow> = schedule_events::table
        .filter(schedule_events::schedule_id.eq(schedule_id.value()))
        .filter(schedule_events::is_active.eq(1))
        .filter(schedule_events::start_date.le(last.as_str()))
        .filter(schedule_events::end_date.ge(first.as_str()))
        .order((
            schedule_events::start_date.asc(),
            schedule_events::end_date.asc(),
            schedule_events::event_id.asc(),
        ))
        .select(EventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(|row| row.into_data(&codes)).collect()
}

/// Retrieves an active event.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the event does not exist or was removed.
pub fn get_event(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    event_id: EventId,
) -> Result<Option<EventData>, PersistenceError> {
    let result: Result<EventRow, diesel::result::Error> = schedule_events::table
        .filter(schedule_events::schedule_id.eq(schedule_id.value()))
        .filter(schedule_events::event_id.eq(event_id.value()))
        .filter(schedule_events::is_active.eq(1))
        .select(EventRow::as_select())
        .first(conn);

    match result {
        Ok(row) => {
            let codes: BTreeMap<CoverageCodeId, CoverageCodeData> =
                code_lookup(conn, schedule_id)?;
            row.into_data(&codes).map(Some)
        }
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
