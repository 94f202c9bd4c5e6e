// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftboard::EventRecord;
use shiftboard_domain::{
    CoverageCodeId, DisplayMode, EmployeeTypeId, HexColor, Pattern, PatternId, ScheduleId,
    ScheduleRole, StoredPattern, UserOid,
};
use time::Date;

/// A schedule (tenant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleData {
    pub schedule_id: ScheduleId,
    pub name: String,
    pub is_active: bool,
}

/// A schedule member and their role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberData {
    pub user_oid: UserOid,
    pub display_name: Option<String>,
    pub role: ScheduleRole,
    pub is_active: bool,
}

/// A stored rotation pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternData {
    pub pattern_id: PatternId,
    pub name: String,
    pub summary: String,
    pub pattern: StoredPattern,
    pub is_active: bool,
    pub created_by: Option<String>,
}

/// A validated pattern ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternWrite {
    pub name: String,
    pub summary: String,
    pub pattern: Pattern,
}

/// Input for creating a shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShift {
    pub name: String,
    pub pattern_id: Option<PatternId>,
    pub start_date: Date,
    /// 1-based position; defaults to the end.
    pub display_order: Option<i64>,
}

/// An effective-dated change to a shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftChange {
    pub employee_type_id: EmployeeTypeId,
    pub name: String,
    pub pattern_id: Option<PatternId>,
    pub effective_date: Date,
    /// 1-based position; defaults to the current one.
    pub display_order: Option<i64>,
}

/// An effective-dated placement of a user in a shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentChange {
    pub user_oid: UserOid,
    pub employee_type_id: EmployeeTypeId,
    pub start_date: Date,
    /// 1-based position within the shift; defaults to the end, or to the
    /// current slot when a same-day version in this shift is overwritten.
    pub display_order: Option<i64>,
}

/// A reusable event code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageCodeData {
    pub coverage_code_id: CoverageCodeId,
    pub code: String,
    pub label: String,
    pub display_mode: DisplayMode,
    pub color: HexColor,
    pub sort_order: i64,
    pub is_active: bool,
}

/// Input for creating or replacing a coverage code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageCodeWrite {
    pub code: String,
    pub label: String,
    pub display_mode: DisplayMode,
    pub color: HexColor,
    pub is_active: bool,
}

/// Display values carried by an event without a coverage code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEventStyle {
    pub code: String,
    pub name: String,
    pub display_mode: DisplayMode,
    pub color: HexColor,
}

/// Input for creating or replacing an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventWrite {
    pub employee_type_id: Option<EmployeeTypeId>,
    pub user_oid: Option<UserOid>,
    pub start_date: Date,
    pub end_date: Date,
    pub coverage_code_id: Option<CoverageCodeId>,
    pub custom: Option<CustomEventStyle>,
    pub comments: Option<String>,
}

/// A stored event with the labels needed to display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventData {
    pub record: EventRecord,
    /// Coverage code, else the custom code.
    pub code: Option<String>,
    /// Coverage label, else the custom name.
    pub name: Option<String>,
    pub comments: Option<String>,
}
