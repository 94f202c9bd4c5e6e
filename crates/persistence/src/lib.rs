// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for shiftboard.
//!
//! This crate stores schedules, members, rotation patterns, shifts with
//! their effective-dated version history, user assignments, coverage codes
//! and calendar events in `SQLite` via Diesel.
//!
//! ## Storage Model
//!
//! - `employee_type_versions` holds each shift's history; the
//!   `employee_types` row is a denormalized copy of the version active today
//! - `schedule_user_types` holds every user's assignment history
//! - Removals are soft (`is_active = 0`) except for never-used patterns
//!
//! ## Transactions
//!
//! Planning happens in the pure `shiftboard` core. This crate executes the
//! resulting plans inside `immediate_transaction`, re-reads the affected
//! timeline and verifies it before committing. Any error rolls back every
//! step of the operation.
//!
//! ## Capabilities
//!
//! A `Persistence` handle carries one `StoreCapabilities` value, chosen when
//! it is opened. Every operation that depends on optional features reads it
//! from the handle; the schema is never inspected per call.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives every caller its own shared-cache
//! in-memory database, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use shiftboard::{
    AssignmentRecord, AssignmentVersion, MonthInputs, PatternUsage, RemovalDecision, ShiftRecord,
    ShiftVersion, pattern_usage,
};
use shiftboard_domain::{
    CoverageCodeId, EmployeeTypeId, EventId, MonthRange, PatternId, ScheduleId, ScheduleRole,
    StoreCapabilities, StoredPattern, UserOid,
};
use time::Date;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use backend::sqlite::MIGRATIONS;
pub use data_models::{
    AssignmentChange, CoverageCodeData, CoverageCodeWrite, CustomEventStyle, EventData,
    EventWrite, MemberData, NewShift, PatternData, PatternWrite, ScheduleData, ShiftChange,
};
pub use error::PersistenceError;
pub use mutations::schedules::LAST_MANAGER_MESSAGE;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A `SQLite` store and the capabilities it offers.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    capabilities: StoreCapabilities,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            capabilities: StoreCapabilities::full(),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::configure_file_database(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            capabilities: StoreCapabilities::full(),
        })
    }

    /// Replaces the capabilities this handle reports.
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: StoreCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// The capabilities chosen when the handle was opened.
    #[must_use]
    pub const fn capabilities(&self) -> StoreCapabilities {
        self.capabilities
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Schedules & Members
    // ========================================================================

    /// Creates a schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_schedule(&mut self, name: &str) -> Result<ScheduleId, PersistenceError> {
        mutations::schedules::create_schedule(&mut self.conn, name)
    }

    /// Retrieves a schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_schedule(
        &mut self,
        schedule_id: ScheduleId,
    ) -> Result<Option<ScheduleData>, PersistenceError> {
        queries::schedules::get_schedule(&mut self.conn, schedule_id)
    }

    /// Adds a member or replaces an existing member's name and role.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` when the change would demote the last Manager, or
    /// a database error.
    pub fn upsert_member(
        &mut self,
        schedule_id: ScheduleId,
        user_oid: &UserOid,
        display_name: Option<&str>,
        role: ScheduleRole,
    ) -> Result<(), PersistenceError> {
        mutations::schedules::upsert_member(&mut self.conn, schedule_id, user_oid, display_name, role)
    }

    /// Changes an active member's role.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown members, `Conflict` when the change
    /// would demote the last Manager, or a database error.
    pub fn set_member_role(
        &mut self,
        schedule_id: ScheduleId,
        user_oid: &UserOid,
        role: ScheduleRole,
    ) -> Result<(), PersistenceError> {
        mutations::schedules::set_member_role(&mut self.conn, schedule_id, user_oid, role)
    }

    /// Sets or clears a member's display name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown members, or a database error.
    pub fn set_display_name(
        &mut self,
        schedule_id: ScheduleId,
        user_oid: &UserOid,
        display_name: Option<&str>,
    ) -> Result<(), PersistenceError> {
        mutations::schedules::set_display_name(&mut self.conn, schedule_id, user_oid, display_name)
    }

    /// Removes a member's access.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown members, `Conflict` for the last
    /// Manager, or a database error.
    pub fn deactivate_member(
        &mut self,
        schedule_id: ScheduleId,
        user_oid: &UserOid,
    ) -> Result<(), PersistenceError> {
        mutations::schedules::deactivate_member(&mut self.conn, schedule_id, user_oid)
    }

    /// Retrieves a member, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_member(
        &mut self,
        schedule_id: ScheduleId,
        user_oid: &UserOid,
    ) -> Result<Option<MemberData>, PersistenceError> {
        queries::schedules::get_member(&mut self.conn, schedule_id, user_oid)
    }

    /// The role of an active member, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn member_role(
        &mut self,
        schedule_id: ScheduleId,
        user_oid: &UserOid,
    ) -> Result<Option<ScheduleRole>, PersistenceError> {
        queries::schedules::member_role(&mut self.conn, schedule_id, user_oid)
    }

    /// Lists active members sorted by display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_members(
        &mut self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<MemberData>, PersistenceError> {
        queries::schedules::list_members(&mut self.conn, schedule_id)
    }

    // ========================================================================
    // Patterns
    // ========================================================================

    /// Lists active patterns sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_patterns(
        &mut self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<PatternData>, PersistenceError> {
        queries::patterns::list_patterns(&mut self.conn, schedule_id)
    }

    /// Retrieves an active pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_pattern(
        &mut self,
        schedule_id: ScheduleId,
        pattern_id: PatternId,
    ) -> Result<Option<PatternData>, PersistenceError> {
        queries::patterns::get_pattern(&mut self.conn, schedule_id, pattern_id)
    }

    /// Every stored pattern payload, removed ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_pattern_payloads(
        &mut self,
        schedule_id: ScheduleId,
    ) -> Result<BTreeMap<PatternId, StoredPattern>, PersistenceError> {
        queries::patterns::load_pattern_payloads(&mut self.conn, schedule_id)
    }

    /// Creates a pattern.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` for a duplicate name, or a database error.
    pub fn create_pattern(
        &mut self,
        schedule_id: ScheduleId,
        write: &PatternWrite,
        actor: Option<&str>,
    ) -> Result<PatternId, PersistenceError> {
        mutations::patterns::create_pattern(&mut self.conn, schedule_id, write, actor)
    }

    /// Replaces an active pattern.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Conflict` for a duplicate name, or a database
    /// error.
    pub fn update_pattern(
        &mut self,
        schedule_id: ScheduleId,
        pattern_id: PatternId,
        write: &PatternWrite,
    ) -> Result<(), PersistenceError> {
        mutations::patterns::update_pattern(&mut self.conn, schedule_id, pattern_id, write)
    }

    /// Counts the shifts referencing a pattern, in any version and today.
    ///
    /// # Errors
    ///
    /// Returns an error if the shift histories cannot be read.
    pub fn pattern_usage(
        &mut self,
        schedule_id: ScheduleId,
        pattern_id: PatternId,
        today: Date,
    ) -> Result<PatternUsage, PersistenceError> {
        let timelines: BTreeMap<EmployeeTypeId, Vec<ShiftVersion>> =
            queries::shifts::all_shift_timelines(&mut self.conn, schedule_id, self.capabilities)?;
        Ok(pattern_usage(pattern_id, &timelines, today))
    }

    /// Removes a pattern, cascading to the shifts that use it today.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, a timeline error, or a database error. Nothing is
    /// written on error.
    pub fn remove_pattern(
        &mut self,
        schedule_id: ScheduleId,
        pattern_id: PatternId,
        today: Date,
        confirm_active_removal: bool,
        actor: Option<&str>,
    ) -> Result<RemovalDecision, PersistenceError> {
        mutations::patterns::remove_pattern(
            &mut self.conn,
            schedule_id,
            pattern_id,
            today,
            confirm_active_removal,
            self.capabilities,
            actor,
        )
    }

    // ========================================================================
    // Shifts
    // ========================================================================

    /// Lists active shifts in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_shifts(
        &mut self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<ShiftRecord>, PersistenceError> {
        queries::shifts::list_shifts(&mut self.conn, schedule_id)
    }

    /// Retrieves an active shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_shift(
        &mut self,
        schedule_id: ScheduleId,
        employee_type_id: EmployeeTypeId,
    ) -> Result<Option<ShiftRecord>, PersistenceError> {
        queries::shifts::get_shift(&mut self.conn, schedule_id, employee_type_id)
    }

    /// A shift's version history ordered by start date.
    ///
    /// Without versioning support, or before the first change, the row is
    /// reported as a single open version.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown shifts, or a database error.
    pub fn shift_timeline(
        &mut self,
        schedule_id: ScheduleId,
        employee_type_id: EmployeeTypeId,
    ) -> Result<Vec<ShiftVersion>, PersistenceError> {
        let shift: ShiftRecord =
            queries::shifts::get_shift(&mut self.conn, schedule_id, employee_type_id)?
                .ok_or_else(|| PersistenceError::NotFound(format!("Shift {employee_type_id}")))?;
        queries::shifts::shift_timeline(&mut self.conn, schedule_id, &shift, self.capabilities)
    }

    /// Creates a shift.
    ///
    /// # Errors
    ///
    /// Returns `Conflict`, `NotFound` for an unknown pattern,
    /// `DomainViolation` for a bad position, or a database error.
    pub fn create_shift(
        &mut self,
        schedule_id: ScheduleId,
        new_shift: &NewShift,
        actor: Option<&str>,
    ) -> Result<ShiftRecord, PersistenceError> {
        mutations::shifts::create_shift(
            &mut self.conn,
            schedule_id,
            new_shift,
            self.capabilities,
            actor,
        )
    }

    /// Applies an effective-dated change to a shift.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Conflict`, `DomainViolation`,
    /// `TimelineViolation`, or a database error.
    pub fn update_shift(
        &mut self,
        schedule_id: ScheduleId,
        change: &ShiftChange,
        today: Date,
        actor: Option<&str>,
    ) -> Result<ShiftRecord, PersistenceError> {
        mutations::shifts::update_shift(
            &mut self.conn,
            schedule_id,
            change,
            self.capabilities,
            today,
            actor,
        )
    }

    // ========================================================================
    // Assignments
    // ========================================================================

    /// Assignments in effect on `as_of`, in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn assignments_on(
        &mut self,
        schedule_id: ScheduleId,
        as_of: Date,
    ) -> Result<Vec<AssignmentRecord>, PersistenceError> {
        queries::assignments::assignments_on(&mut self.conn, schedule_id, as_of)
    }

    /// One user's assignment history ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn user_timeline(
        &mut self,
        schedule_id: ScheduleId,
        user_oid: &UserOid,
    ) -> Result<Vec<AssignmentVersion>, PersistenceError> {
        queries::assignments::user_timeline(&mut self.conn, schedule_id, user_oid)
    }

    /// Places a user in a shift from a start date.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `DomainViolation`, `TimelineViolation`, or a
    /// database error.
    pub fn upsert_assignment(
        &mut self,
        schedule_id: ScheduleId,
        change: &AssignmentChange,
        actor: Option<&str>,
    ) -> Result<Vec<AssignmentVersion>, PersistenceError> {
        mutations::assignments::upsert_assignment(&mut self.conn, schedule_id, change, actor)
    }

    // ========================================================================
    // Coverage Codes & Events
    // ========================================================================

    /// Lists coverage codes in sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_coverage_codes(
        &mut self,
        schedule_id: ScheduleId,
        include_inactive: bool,
    ) -> Result<Vec<CoverageCodeData>, PersistenceError> {
        queries::events::list_coverage_codes(&mut self.conn, schedule_id, include_inactive)
    }

    /// Creates a coverage code.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` for a duplicate code, or a database error.
    pub fn create_coverage_code(
        &mut self,
        schedule_id: ScheduleId,
        write: &CoverageCodeWrite,
        actor: Option<&str>,
    ) -> Result<CoverageCodeId, PersistenceError> {
        mutations::events::create_coverage_code(&mut self.conn, schedule_id, write, actor)
    }

    /// Replaces a coverage code.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Conflict`, or a database error.
    pub fn update_coverage_code(
        &mut self,
        schedule_id: ScheduleId,
        coverage_code_id: CoverageCodeId,
        write: &CoverageCodeWrite,
    ) -> Result<(), PersistenceError> {
        mutations::events::update_coverage_code(&mut self.conn, schedule_id, coverage_code_id, write)
    }

    /// Active events intersecting `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn events_between(
        &mut self,
        schedule_id: ScheduleId,
        start: Date,
        end: Date,
    ) -> Result<Vec<EventData>, PersistenceError> {
        queries::events::events_between(&mut self.conn, schedule_id, start, end)
    }

    /// Retrieves an active event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_event(
        &mut self,
        schedule_id: ScheduleId,
        event_id: EventId,
    ) -> Result<Option<EventData>, PersistenceError> {
        queries::events::get_event(&mut self.conn, schedule_id, event_id)
    }

    /// Creates an event.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for missing references, or a database error.
    pub fn create_event(
        &mut self,
        schedule_id: ScheduleId,
        write: &EventWrite,
        actor: Option<&str>,
    ) -> Result<EventId, PersistenceError> {
        mutations::events::create_event(
            &mut self.conn,
            schedule_id,
            write,
            self.capabilities,
            actor,
        )
    }

    /// Replaces an event.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or a database error.
    pub fn update_event(
        &mut self,
        schedule_id: ScheduleId,
        event_id: EventId,
        write: &EventWrite,
    ) -> Result<(), PersistenceError> {
        mutations::events::update_event(
            &mut self.conn,
            schedule_id,
            event_id,
            write,
            self.capabilities,
        )
    }

    /// Removes an event.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or a database error.
    pub fn delete_event(
        &mut self,
        schedule_id: ScheduleId,
        event_id: EventId,
    ) -> Result<(), PersistenceError> {
        mutations::events::delete_event(&mut self.conn, schedule_id, event_id)
    }

    // ========================================================================
    // Month View
    // ========================================================================

    /// Reads everything one month view needs.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub fn load_month_inputs(
        &mut self,
        schedule_id: ScheduleId,
        range: MonthRange,
    ) -> Result<MonthInputs, PersistenceError> {
        queries::month::load_month_inputs(&mut self.conn, schedule_id, range, self.capabilities)
    }
}
