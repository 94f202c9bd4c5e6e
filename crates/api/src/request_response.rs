// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names serialize in camelCase and dates as `YYYY-MM-DD` strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shiftboard_domain::{CellEventVisuals, PatternInput};

// ============================================================================
// Capabilities
// ============================================================================

/// Represents whether a specific action is permitted.
///
/// Serializes to JSON as true/false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let b: bool = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(b))
    }
}

/// What the caller may do in one schedule, for UI gating.
///
/// Advisory only; every handler re-checks the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCapabilities {
    /// The caller's role name.
    pub role: String,
    /// Patterns, shifts, assignments, codes and events may be edited.
    pub can_edit_schedule: Capability,
    /// Members and roles may be changed.
    pub can_manage_members: Capability,
    /// Events may target a single shift.
    pub can_scope_events_to_shifts: Capability,
    /// Events may carry their own display mode and colour.
    pub can_use_custom_event_colors: Capability,
    /// Shift changes keep an effective-dated history.
    pub has_shift_history: Capability,
}

// ============================================================================
// Patterns
// ============================================================================

/// Request to create or replace a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternRequest {
    pub name: String,
    pub pattern: PatternInput,
}

/// Request to remove a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePatternRequest {
    pub pattern_id: i64,
    /// Required when shifts use the pattern today.
    #[serde(default)]
    pub confirm_active_removal: bool,
}

/// One stored pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInfo {
    pub pattern_id: i64,
    pub name: String,
    pub summary: String,
    /// Editor shape; `None` when the stored payload could not be read.
    pub pattern: Option<PatternInput>,
    pub shift_usage_count: usize,
    pub active_shift_usage_count: usize,
}

/// Response listing the active patterns of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPatternsResponse {
    pub patterns: Vec<PatternInfo>,
}

/// Outcome of a pattern removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePatternResponse {
    pub pattern_id: i64,
    /// `hard-delete`, `soft-remove` or `removed-with-unassigned-transition`.
    pub mode: String,
    /// Shifts split so the pattern no longer applies from today.
    pub unassigned_shift_ids: Vec<i64>,
}

/// Request to preview a pattern without saving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPatternRequest {
    pub pattern: PatternInput,
}

/// An inferred rotation for one swatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInfo {
    pub on_days: u8,
    pub off_days: u8,
    pub anchor: u8,
    pub predicted_on: Vec<u8>,
}

/// One swatch of a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwatchPreview {
    pub swatch_index: u8,
    pub color: String,
    pub on_days: Vec<u8>,
    pub prediction: Option<PredictionInfo>,
}

/// Response describing how a pattern would render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPatternResponse {
    pub summary: String,
    pub conflicting: bool,
    pub swatches: Vec<SwatchPreview>,
    /// Colour of cycle days 1 through 28; `None` for no shift.
    pub cycle_colors: Vec<Option<String>>,
}

// ============================================================================
// Shifts
// ============================================================================

/// Request to create a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    pub name: String,
    pub pattern_id: Option<i64>,
    pub start_date: String,
    pub display_order: Option<i64>,
}

/// Request to change a shift from an effective date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    pub employee_type_id: i64,
    pub name: String,
    pub pattern_id: Option<i64>,
    pub effective_date: String,
    pub display_order: Option<i64>,
}

/// A shift as it applies today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftInfo {
    pub employee_type_id: i64,
    pub name: String,
    pub pattern_id: Option<i64>,
    pub start_date: String,
    pub display_order: i64,
}

/// Response listing shifts in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListShiftsResponse {
    pub shifts: Vec<ShiftInfo>,
}

/// One dated version of a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftVersionInfo {
    pub start_date: String,
    pub end_date: Option<String>,
    pub name: String,
    pub pattern_id: Option<i64>,
}

/// Response with a shift's full history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListShiftVersionsResponse {
    pub employee_type_id: i64,
    pub versions: Vec<ShiftVersionInfo>,
}

// ============================================================================
// Assignments
// ============================================================================

/// Request to place a user in a shift from a start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertAssignmentRequest {
    pub user_oid: String,
    pub employee_type_id: i64,
    pub start_date: String,
    pub display_order: Option<i64>,
}

/// Request listing assignments on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssignmentsRequest {
    /// Defaults to today.
    pub as_of: Option<String>,
}

/// One dated assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInfo {
    pub user_oid: String,
    pub employee_type_id: i64,
    pub display_order: i64,
    pub start_date: String,
    pub end_date: Option<String>,
}

/// Response listing assignments in effect on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssignmentsResponse {
    pub as_of: String,
    pub assignments: Vec<AssignmentInfo>,
}

/// Response with a user's timeline after an upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertAssignmentResponse {
    pub user_oid: String,
    pub timeline: Vec<AssignmentInfo>,
}

// ============================================================================
// Coverage codes & events
// ============================================================================

/// Request to create or replace a coverage code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageCodeRequest {
    pub code: String,
    pub label: String,
    pub display_mode: String,
    pub color: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// One coverage code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageCodeInfo {
    pub coverage_code_id: i64,
    pub code: String,
    pub label: String,
    pub display_mode: String,
    pub color: String,
    pub sort_order: i64,
    pub is_active: bool,
}

/// Response listing coverage codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCoverageCodesResponse {
    pub coverage_codes: Vec<CoverageCodeInfo>,
}

/// Request for the events touching an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsRequest {
    pub start_date: String,
    pub end_date: String,
}

/// Response listing events in start-date order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsResponse {
    pub events: Vec<EventInfo>,
}

/// Request to create or replace an event.
///
/// Either `coverageCodeId` or the custom `customCode`, `displayMode` and
/// `color` trio must be supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    /// `global`, `shift` or `user`.
    pub scope_type: String,
    pub employee_type_id: Option<i64>,
    pub user_oid: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub coverage_code_id: Option<i64>,
    pub custom_code: Option<String>,
    pub custom_name: Option<String>,
    pub display_mode: Option<String>,
    pub color: Option<String>,
    pub comments: Option<String>,
}

/// One stored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub event_id: i64,
    pub scope_type: String,
    pub employee_type_id: Option<i64>,
    pub user_oid: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub coverage_code_id: Option<i64>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub display_mode: String,
    pub color: String,
    pub comments: Option<String>,
}

// ============================================================================
// Month view
// ============================================================================

/// Request for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRequest {
    pub year: i32,
    /// 0-based month index.
    pub month_index: i32,
}

/// One employee row of the month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthEmployeeInfo {
    pub user_oid: String,
    pub name: String,
    pub role: String,
    pub day_colors: BTreeMap<u8, String>,
    pub day_visuals: BTreeMap<u8, CellEventVisuals>,
}

/// One shift section of the month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGroupInfo {
    pub employee_type_id: i64,
    pub category: String,
    pub employees: Vec<MonthEmployeeInfo>,
    pub day_visuals: BTreeMap<u8, CellEventVisuals>,
}

/// A resolved event of the month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthEventInfo {
    pub event_id: i64,
    pub scope_type: String,
    pub employee_type_id: Option<i64>,
    pub user_oid: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub display_mode: String,
    pub color: String,
}

/// Response for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthResponse {
    pub year: i32,
    pub month_index: i32,
    pub month_start: String,
    pub month_end: String,
    pub groups: Vec<MonthGroupInfo>,
    pub events: Vec<MonthEventInfo>,
}

// ============================================================================
// Members
// ============================================================================

/// Request to add a member or change an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMemberRequest {
    pub user_oid: String,
    pub display_name: Option<String>,
    pub role: String,
}

/// One active member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub user_oid: String,
    pub display_name: Option<String>,
    pub role: String,
}

/// Response listing the active members of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMembersResponse {
    pub members: Vec<MemberInfo>,
}

/// Request to rename a member or change their role.
///
/// Omitted fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub user_oid: String,
    pub display_name: Option<String>,
    pub role: Option<String>,
}

/// Request to remove a member from a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberRequest {
    pub user_oid: String,
}
