// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler resolves the caller's role first, validates the request
//! into domain values, then delegates to persistence. No handler writes
//! anything when validation fails.

use std::collections::BTreeMap;

use shiftboard::{
    AssignmentRecord, AssignmentVersion, MonthEmployee, MonthGroup, MonthInputs, MonthView,
    PATTERN_ACTIVE_IN_USE, PatternUsage, RemovalDecision, RemovalMode, ShiftRecord, ShiftVersion,
    build_month_view,
};
use shiftboard_domain::{
    COMMENTS_MAX, CoverageCodeId, DisplayMode, DomainError, EmployeeTypeId, EventId, EventScope,
    EventScopeType, HexColor, LABEL_MAX, MonthRange, PATTERN_CYCLE_DAYS, PATTERN_NAME_MAX, Pattern,
    PatternId, ResolvedPattern, SHIFT_NAME_MAX, ScheduleEvent, ScheduleId, ScheduleRole,
    StoreCapabilities, UserOid, clean_optional_text, format_date, has_prediction_conflict,
    normalize_event_code, parse_date, summarize_pattern, summarize_resolved, validate_date_range,
    validate_month, validate_name,
};
use shiftboard_persistence::{
    AssignmentChange, CoverageCodeData, CoverageCodeWrite, CustomEventStyle, EventData,
    EventWrite, MemberData, NewShift, PatternData, PatternWrite, Persistence, ShiftChange,
};
use time::Date;

use crate::auth::{AuthorizationService, AuthorizedCaller, Caller};
use crate::capabilities::compute_schedule_capabilities;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::pattern_input::validate_pattern_input;
use crate::request_response::{
    AssignmentInfo, CoverageCodeInfo, CoverageCodeRequest, CreateShiftRequest,
    DeletePatternRequest, DeletePatternResponse, EventInfo, EventRequest, ListAssignmentsRequest,
    ListAssignmentsResponse, ListCoverageCodesResponse, ListEventsRequest, ListEventsResponse,
    ListMembersResponse, ListPatternsResponse,
    ListShiftVersionsResponse, ListShiftsResponse, MemberInfo, MonthEmployeeInfo, MonthEventInfo,
    MonthGroupInfo, MonthRequest, MonthResponse, PatternInfo, PatternRequest, PredictionInfo,
    PreviewPatternRequest, PreviewPatternResponse, ScheduleCapabilities, ShiftInfo,
    RemoveMemberRequest, ShiftVersionInfo, SwatchPreview, UpdateMemberRequest, UpdateShiftRequest,
    UpsertAssignmentRequest, UpsertAssignmentResponse, UpsertMemberRequest,
};

// ============================================================================
// Conversion helpers
// ============================================================================

fn date_string(date: Date) -> Result<String, ApiError> {
    format_date(date).map_err(translate_domain_error)
}

fn optional_date_string(date: Option<Date>) -> Result<Option<String>, ApiError> {
    date.map(date_string).transpose()
}

/// Parses a request date, reporting failures against the request field.
fn parse_date_field(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_date(value).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn parse_user_oid(value: &str) -> Result<UserOid, ApiError> {
    UserOid::new(value).map_err(translate_domain_error)
}

fn invalid(field: &str, message: &str) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn pattern_info(data: PatternData, usage: PatternUsage) -> PatternInfo {
    PatternInfo {
        pattern_id: data.pattern_id.value(),
        name: data.name,
        summary: data.summary,
        pattern: data.pattern.pattern().map(Pattern::to_input),
        shift_usage_count: usage.shift_usage_count,
        active_shift_usage_count: usage.active_shift_usage_count,
    }
}

fn shift_info(record: &ShiftRecord) -> Result<ShiftInfo, ApiError> {
    Ok(ShiftInfo {
        employee_type_id: record.employee_type_id.value(),
        name: record.name.clone(),
        pattern_id: record.pattern_id.map(PatternId::value),
        start_date: date_string(record.start_date)?,
        display_order: record.display_order,
    })
}

fn shift_version_info(version: &ShiftVersion) -> Result<ShiftVersionInfo, ApiError> {
    Ok(ShiftVersionInfo {
        start_date: date_string(version.start_date)?,
        end_date: optional_date_string(version.end_date)?,
        name: version.fields.name.clone(),
        pattern_id: version.fields.pattern_id.map(PatternId::value),
    })
}

fn assignment_info(
    user_oid: &UserOid,
    version: &AssignmentVersion,
) -> Result<AssignmentInfo, ApiError> {
    Ok(AssignmentInfo {
        user_oid: user_oid.to_string(),
        employee_type_id: version.fields.employee_type_id.value(),
        display_order: version.fields.display_order,
        start_date: date_string(version.start_date)?,
        end_date: optional_date_string(version.end_date)?,
    })
}

fn coverage_code_info(data: &CoverageCodeData) -> CoverageCodeInfo {
    CoverageCodeInfo {
        coverage_code_id: data.coverage_code_id.value(),
        code: data.code.clone(),
        label: data.label.clone(),
        display_mode: data.display_mode.label().to_string(),
        color: data.color.to_string(),
        sort_order: data.sort_order,
        is_active: data.is_active,
    }
}

fn event_info(data: &EventData, capabilities: StoreCapabilities) -> Result<EventInfo, ApiError> {
    let resolved: ScheduleEvent = data.record.resolve(capabilities);
    Ok(EventInfo {
        event_id: data.record.event_id.value(),
        scope_type: resolved.scope.scope_type().as_str().to_string(),
        employee_type_id: resolved.scope.employee_type_id().map(EmployeeTypeId::value),
        user_oid: resolved.scope.user_oid().map(ToString::to_string),
        start_date: date_string(data.record.start_date)?,
        end_date: date_string(data.record.end_date)?,
        coverage_code_id: data.record.coverage_code_id.map(CoverageCodeId::value),
        code: data.code.clone(),
        name: data.name.clone(),
        display_mode: resolved.display_mode.label().to_string(),
        color: resolved.color.to_string(),
        comments: data.comments.clone(),
    })
}

fn member_info(data: MemberData) -> MemberInfo {
    MemberInfo {
        user_oid: data.user_oid.to_string(),
        display_name: data.display_name,
        role: data.role.as_str().to_string(),
    }
}

// ============================================================================
// Patterns
// ============================================================================

/// Validates a pattern request into a write.
///
/// Patterns with no selected day are rejected; an empty editor is never a
/// usable rotation.
fn pattern_write(request: &PatternRequest) -> Result<PatternWrite, ApiError> {
    let name: String =
        validate_name("name", &request.name, PATTERN_NAME_MAX).map_err(translate_domain_error)?;
    let pattern: Pattern = validate_pattern_input(&request.pattern)?;
    if pattern.selected_day_count() == 0 {
        return Err(translate_domain_error(DomainError::EmptyPattern));
    }
    Ok(PatternWrite {
        name,
        summary: summarize_pattern(&pattern),
        pattern,
    })
}

/// Lists the active patterns of a schedule with their usage counts.
///
/// # Errors
///
/// Returns an error if the caller is not a member or the store fails.
pub fn list_patterns(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    today: Date,
) -> Result<ListPatternsResponse, ApiError> {
    AuthorizationService::authorize_read(persistence, caller, schedule_id, "list_patterns")?;

    let patterns: Vec<PatternData> = persistence
        .list_patterns(schedule_id)
        .map_err(translate_persistence_error)?;
    let mut infos: Vec<PatternInfo> = Vec::with_capacity(patterns.len());
    for data in patterns {
        let usage: PatternUsage = persistence
            .pattern_usage(schedule_id, data.pattern_id, today)
            .map_err(translate_persistence_error)?;
        infos.push(pattern_info(data, usage));
    }
    Ok(ListPatternsResponse { patterns: infos })
}

/// Creates a pattern.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is below Maintainer
/// - The name or pattern is invalid
/// - An active pattern already has the name
pub fn create_pattern(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &PatternRequest,
) -> Result<PatternInfo, ApiError> {
    let authorized: AuthorizedCaller =
        AuthorizationService::authorize_edit(persistence, caller, schedule_id, "create_pattern")?;
    let write: PatternWrite = pattern_write(request)?;

    let pattern_id: PatternId = persistence
        .create_pattern(schedule_id, &write, authorized.actor())
        .map_err(translate_persistence_error)?;

    Ok(PatternInfo {
        pattern_id: pattern_id.value(),
        name: write.name,
        summary: write.summary,
        pattern: Some(write.pattern.to_input()),
        shift_usage_count: 0,
        active_shift_usage_count: 0,
    })
}

/// Replaces a pattern's name and days.
///
/// Shifts using the pattern pick up the change everywhere, including
/// history; patterns are not versioned.
///
/// # Errors
///
/// Returns an error if the caller is below Maintainer, the input is
/// invalid, the pattern does not exist or the name is taken.
pub fn update_pattern(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    pattern_id: i64,
    request: &PatternRequest,
    today: Date,
) -> Result<PatternInfo, ApiError> {
    AuthorizationService::authorize_edit(persistence, caller, schedule_id, "update_pattern")?;
    let write: PatternWrite = pattern_write(request)?;
    let pattern_id: PatternId = PatternId::new(pattern_id);

    persistence
        .update_pattern(schedule_id, pattern_id, &write)
        .map_err(translate_persistence_error)?;
    let usage: PatternUsage = persistence
        .pattern_usage(schedule_id, pattern_id, today)
        .map_err(translate_persistence_error)?;

    Ok(PatternInfo {
        pattern_id: pattern_id.value(),
        name: write.name,
        summary: write.summary,
        pattern: Some(write.pattern.to_input()),
        shift_usage_count: usage.shift_usage_count,
        active_shift_usage_count: usage.active_shift_usage_count,
    })
}

/// Removes a pattern.
///
/// Unused patterns are deleted. Patterns in use today require
/// `confirm_active_removal`; the affected shifts then become unassigned
/// from today while history keeps its colours.
///
/// # Errors
///
/// Returns `NeedsConfirmation` when shifts use the pattern today and the
/// request did not confirm, or another error if the caller is below
/// Maintainer or the pattern does not exist.
pub fn delete_pattern(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &DeletePatternRequest,
    today: Date,
) -> Result<DeletePatternResponse, ApiError> {
    let authorized: AuthorizedCaller =
        AuthorizationService::authorize_edit(persistence, caller, schedule_id, "delete_pattern")?;
    let pattern_id: PatternId = PatternId::new(request.pattern_id);

    let decision: RemovalDecision = persistence
        .remove_pattern(
            schedule_id,
            pattern_id,
            today,
            request.confirm_active_removal,
            authorized.actor(),
        )
        .map_err(translate_persistence_error)?;

    let (mode, unassigned_shift_ids): (RemovalMode, Vec<i64>) = match &decision {
        RemovalDecision::NeedsConfirmation {
            active_shift_usage_count,
        } => {
            return Err(ApiError::NeedsConfirmation {
                code: PATTERN_ACTIVE_IN_USE.to_string(),
                message: format!(
                    "Pattern {pattern_id} is used by {active_shift_usage_count} shift(s) today"
                ),
                active_shift_usage_count: *active_shift_usage_count,
            });
        }
        RemovalDecision::HardDelete => (RemovalMode::HardDelete, Vec::new()),
        RemovalDecision::SoftRemove { unassign } => (
            decision.mode().unwrap_or(RemovalMode::SoftRemove),
            unassign.iter().map(|(id, _)| id.value()).collect(),
        ),
    };

    Ok(DeletePatternResponse {
        pattern_id: pattern_id.value(),
        mode: mode.as_str().to_string(),
        unassigned_shift_ids,
    })
}

/// Describes how a pattern would render without saving it.
///
/// # Errors
///
/// Returns an error if the caller is not a member or the pattern is invalid.
pub fn preview_pattern(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &PreviewPatternRequest,
) -> Result<PreviewPatternResponse, ApiError> {
    AuthorizationService::authorize_read(persistence, caller, schedule_id, "preview_pattern")?;
    let pattern: Pattern = validate_pattern_input(&request.pattern)?;
    Ok(describe_pattern(pattern))
}

/// Builds the preview of a validated pattern.
#[must_use]
pub fn describe_pattern(pattern: Pattern) -> PreviewPatternResponse {
    let resolved: ResolvedPattern = ResolvedPattern::new(pattern);

    let swatches: Vec<SwatchPreview> = resolved
        .pattern()
        .swatches()
        .iter()
        .zip(resolved.predictions())
        .map(|(swatch, prediction)| SwatchPreview {
            swatch_index: swatch.index(),
            color: swatch.color().to_string(),
            on_days: swatch.on_days().iter().copied().collect(),
            prediction: prediction.as_ref().map(|p| PredictionInfo {
                on_days: p.on_days(),
                off_days: p.off_days(),
                anchor: p.anchor(),
                predicted_on: p.predicted_on().iter().copied().collect(),
            }),
        })
        .collect();
    let cycle_colors: Vec<Option<String>> = (1..=i64::from(PATTERN_CYCLE_DAYS))
        .map(|day| resolved.color_for_day(day).map(ToString::to_string))
        .collect();

    PreviewPatternResponse {
        summary: summarize_resolved(&resolved),
        conflicting: has_prediction_conflict(&resolved),
        swatches,
        cycle_colors,
    }
}

// ============================================================================
// Shifts
// ============================================================================

/// Lists shifts as they apply today, in display order.
///
/// # Errors
///
/// Returns an error if the caller is not a member or the store fails.
pub fn list_shifts(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
) -> Result<ListShiftsResponse, ApiError> {
    AuthorizationService::authorize_read(persistence, caller, schedule_id, "list_shifts")?;
    let shifts: Vec<ShiftRecord> = persistence
        .list_shifts(schedule_id)
        .map_err(translate_persistence_error)?;
    Ok(ListShiftsResponse {
        shifts: shifts.iter().map(shift_info).collect::<Result<_, _>>()?,
    })
}

/// Creates a shift with an open-ended first version.
///
/// # Errors
///
/// Returns an error if the caller is below Maintainer, the name or date is
/// invalid, the name is taken, the pattern does not exist or the position
/// is out of range.
pub fn create_shift(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &CreateShiftRequest,
) -> Result<ShiftInfo, ApiError> {
    let authorized: AuthorizedCaller =
        AuthorizationService::authorize_edit(persistence, caller, schedule_id, "create_shift")?;
    let new_shift: NewShift = NewShift {
        name: validate_name("name", &request.name, SHIFT_NAME_MAX)
            .map_err(translate_domain_error)?,
        pattern_id: request.pattern_id.map(PatternId::new),
        start_date: parse_date_field("startDate", &request.start_date)?,
        display_order: request.display_order,
    };

    let record: ShiftRecord = persistence
        .create_shift(schedule_id, &new_shift, authorized.actor())
        .map_err(translate_persistence_error)?;
    shift_info(&record)
}

/// Changes a shift's name or pattern from an effective date.
///
/// The change splits, overwrites or precedes existing versions so the
/// history stays gap-free; the display position changes immediately.
///
/// # Errors
///
/// Returns an error if the caller is below Maintainer, the input is
/// invalid, the shift or pattern does not exist or the name is taken.
pub fn update_shift(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &UpdateShiftRequest,
    today: Date,
) -> Result<ShiftInfo, ApiError> {
    let authorized: AuthorizedCaller =
        AuthorizationService::authorize_edit(persistence, caller, schedule_id, "update_shift")?;
    let change: ShiftChange = ShiftChange {
        employee_type_id: EmployeeTypeId::new(request.employee_type_id),
        name: validate_name("name", &request.name, SHIFT_NAME_MAX)
            .map_err(translate_domain_error)?,
        pattern_id: request.pattern_id.map(PatternId::new),
        effective_date: parse_date_field("effectiveDate", &request.effective_date)?,
        display_order: request.display_order,
    };

    let record: ShiftRecord = persistence
        .update_shift(schedule_id, &change, today, authorized.actor())
        .map_err(translate_persistence_error)?;
    shift_info(&record)
}

/// Lists every version of a shift, oldest first.
///
/// # Errors
///
/// Returns an error if the caller is not a member or the shift does not exist.
pub fn list_shift_versions(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    employee_type_id: i64,
) -> Result<ListShiftVersionsResponse, ApiError> {
    AuthorizationService::authorize_read(persistence, caller, schedule_id, "list_shift_versions")?;
    let versions: Vec<ShiftVersion> = persistence
        .shift_timeline(schedule_id, EmployeeTypeId::new(employee_type_id))
        .map_err(translate_persistence_error)?;
    Ok(ListShiftVersionsResponse {
        employee_type_id,
        versions: versions
            .iter()
            .map(shift_version_info)
            .collect::<Result<_, _>>()?,
    })
}

// ============================================================================
// Assignments
// ============================================================================

/// Lists the assignments in effect on one day.
///
/// # Errors
///
/// Returns an error if the caller is not a member, the date is invalid or
/// the store fails.
pub fn list_assignments(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &ListAssignmentsRequest,
    today: Date,
) -> Result<ListAssignmentsResponse, ApiError> {
    AuthorizationService::authorize_read(persistence, caller, schedule_id, "list_assignments")?;
    let as_of: Date = match request.as_of.as_deref() {
        Some(value) => parse_date_field("asOf", value)?,
        None => today,
    };

    let records: Vec<AssignmentRecord> = persistence
        .assignments_on(schedule_id, as_of)
        .map_err(translate_persistence_error)?;
    Ok(ListAssignmentsResponse {
        as_of: date_string(as_of)?,
        assignments: records
            .iter()
            .map(|r| assignment_info(&r.user_oid, &r.version))
            .collect::<Result<_, _>>()?,
    })
}

/// Places a member in a shift from a start date.
///
/// # Errors
///
/// Returns an error if the caller is below Maintainer, the input is
/// invalid, the user is not an active member, the shift does not exist or
/// the position is out of range.
pub fn upsert_assignment(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &UpsertAssignmentRequest,
) -> Result<UpsertAssignmentResponse, ApiError> {
    let authorized: AuthorizedCaller = AuthorizationService::authorize_edit(
        persistence,
        caller,
        schedule_id,
        "upsert_assignment",
    )?;
    let change: AssignmentChange = AssignmentChange {
        user_oid: parse_user_oid(&request.user_oid)?,
        employee_type_id: EmployeeTypeId::new(request.employee_type_id),
        start_date: parse_date_field("startDate", &request.start_date)?,
        display_order: request.display_order,
    };

    let timeline: Vec<AssignmentVersion> = persistence
        .upsert_assignment(schedule_id, &change, authorized.actor())
        .map_err(translate_persistence_error)?;
    Ok(UpsertAssignmentResponse {
        user_oid: change.user_oid.to_string(),
        timeline: timeline
            .iter()
            .map(|v| assignment_info(&change.user_oid, v))
            .collect::<Result<_, _>>()?,
    })
}

// ============================================================================
// Coverage Codes
// ============================================================================

fn coverage_code_write(request: &CoverageCodeRequest) -> Result<CoverageCodeWrite, ApiError> {
    Ok(CoverageCodeWrite {
        code: normalize_event_code(&request.code)
            .map_err(|e| translate_domain_error(DomainError::from(e)))?,
        label: validate_name("label", &request.label, LABEL_MAX).map_err(translate_domain_error)?,
        display_mode: DisplayMode::parse(&request.display_mode).map_err(translate_domain_error)?,
        color: HexColor::parse(&request.color).map_err(translate_domain_error)?,
        is_active: request.is_active,
    })
}

fn find_coverage_code(
    persistence: &mut Persistence,
    schedule_id: ScheduleId,
    coverage_code_id: CoverageCodeId,
) -> Result<CoverageCodeInfo, ApiError> {
    persistence
        .list_coverage_codes(schedule_id, true)
        .map_err(translate_persistence_error)?
        .iter()
        .find(|c| c.coverage_code_id == coverage_code_id)
        .map(coverage_code_info)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Event code"),
            message: format!("Event code {coverage_code_id}"),
        })
}

/// Lists coverage codes in sort order.
///
/// # Errors
///
/// Returns an error if the caller is not a member or the store fails.
pub fn list_coverage_codes(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    include_inactive: bool,
) -> Result<ListCoverageCodesResponse, ApiError> {
    AuthorizationService::authorize_read(persistence, caller, schedule_id, "list_coverage_codes")?;
    let codes: Vec<CoverageCodeData> = persistence
        .list_coverage_codes(schedule_id, include_inactive)
        .map_err(translate_persistence_error)?;
    Ok(ListCoverageCodesResponse {
        coverage_codes: codes.iter().map(coverage_code_info).collect(),
    })
}

/// Creates a coverage code at the end of the sort order.
///
/// # Errors
///
/// Returns an error if the caller is below Maintainer, the input is
/// invalid or the code is taken.
pub fn create_coverage_code(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &CoverageCodeRequest,
) -> Result<CoverageCodeInfo, ApiError> {
    let authorized: AuthorizedCaller = AuthorizationService::authorize_edit(
        persistence,
        caller,
        schedule_id,
        "create_coverage_code",
    )?;
    let write: CoverageCodeWrite = coverage_code_write(request)?;

    let coverage_code_id: CoverageCodeId = persistence
        .create_coverage_code(schedule_id, &write, authorized.actor())
        .map_err(translate_persistence_error)?;
    find_coverage_code(persistence, schedule_id, coverage_code_id)
}

/// Replaces a coverage code. Deactivated codes keep rendering on the
/// events that already use them.
///
/// # Errors
///
/// Returns an error if the caller is below Maintainer, the input is
/// invalid, the code does not exist or the new code is taken.
pub fn update_coverage_code(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    coverage_code_id: i64,
    request: &CoverageCodeRequest,
) -> Result<CoverageCodeInfo, ApiError> {
    AuthorizationService::authorize_edit(
        persistence,
        caller,
        schedule_id,
        "update_coverage_code",
    )?;
    let write: CoverageCodeWrite = coverage_code_write(request)?;
    let coverage_code_id: CoverageCodeId = CoverageCodeId::new(coverage_code_id);

    persistence
        .update_coverage_code(schedule_id, coverage_code_id, &write)
        .map_err(translate_persistence_error)?;
    find_coverage_code(persistence, schedule_id, coverage_code_id)
}

// ============================================================================
// Events
// ============================================================================

fn has_custom_values(request: &EventRequest) -> bool {
    request.custom_code.is_some()
        || request.custom_name.is_some()
        || request.display_mode.is_some()
        || request.color.is_some()
}

fn custom_event_style(request: &EventRequest) -> Result<CustomEventStyle, ApiError> {
    let (Some(code), Some(display_mode), Some(color)) = (
        request.custom_code.as_deref(),
        request.display_mode.as_deref(),
        request.color.as_deref(),
    ) else {
        return Err(invalid(
            "coverageCodeId",
            "events need a coverage code or a custom code, display mode and color",
        ));
    };

    let code: String =
        normalize_event_code(code).map_err(|e| translate_domain_error(DomainError::from(e)))?;
    let name: String = clean_optional_text("customName", request.custom_name.as_deref(), LABEL_MAX)
        .map_err(translate_domain_error)?
        .unwrap_or_else(|| code.clone());
    Ok(CustomEventStyle {
        code,
        name,
        display_mode: DisplayMode::parse(display_mode).map_err(translate_domain_error)?,
        color: HexColor::parse(color).map_err(translate_domain_error)?,
    })
}

/// Validates an event request against the store's capabilities.
///
/// Values the store cannot keep are rejected rather than silently dropped.
fn event_write(
    request: &EventRequest,
    capabilities: StoreCapabilities,
) -> Result<EventWrite, ApiError> {
    let scope_type: EventScopeType =
        EventScopeType::parse(&request.scope_type).map_err(translate_domain_error)?;
    if scope_type == EventScopeType::Shift && !capabilities.supports_event_scoping {
        return Err(invalid(
            "scopeType",
            "this schedule cannot scope events to shifts",
        ));
    }
    let user_oid: Option<UserOid> = request
        .user_oid
        .as_deref()
        .map(parse_user_oid)
        .transpose()?;
    let scope: EventScope = EventScope::from_parts(
        scope_type,
        request.employee_type_id.map(EmployeeTypeId::new),
        user_oid,
    )
    .map_err(translate_domain_error)?;

    let start_date: Date = parse_date_field("startDate", &request.start_date)?;
    let end_date: Date = parse_date_field("endDate", &request.end_date)?;
    validate_date_range(start_date, end_date).map_err(translate_domain_error)?;
    let comments: Option<String> =
        clean_optional_text("comments", request.comments.as_deref(), COMMENTS_MAX)
            .map_err(translate_domain_error)?;

    let custom: Option<CustomEventStyle> = match request.coverage_code_id {
        Some(_) if has_custom_values(request) => {
            return Err(invalid(
                "coverageCodeId",
                "use either a coverage code or custom values, not both",
            ));
        }
        Some(_) => None,
        None if !capabilities.supports_custom_event_colors => {
            return Err(invalid(
                "coverageCodeId",
                "this schedule requires a coverage code on every event",
            ));
        }
        None => Some(custom_event_style(request)?),
    };

    Ok(EventWrite {
        employee_type_id: scope.employee_type_id(),
        user_oid: scope.user_oid().cloned(),
        start_date,
        end_date,
        coverage_code_id: request.coverage_code_id.map(CoverageCodeId::new),
        custom,
        comments,
    })
}

fn load_event_info(
    persistence: &mut Persistence,
    schedule_id: ScheduleId,
    event_id: EventId,
) -> Result<EventInfo, ApiError> {
    let data: EventData = persistence
        .get_event(schedule_id, event_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Event"),
            message: format!("Event {event_id}"),
        })?;
    event_info(&data, persistence.capabilities())
}

/// Creates a calendar event.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is below Maintainer
/// - The scope fields do not match the scope type
/// - The end date precedes the start date
/// - Neither a coverage code nor the custom values are supplied
/// - The referenced shift, member or coverage code does not exist
pub fn create_event(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &EventRequest,
) -> Result<EventInfo, ApiError> {
    let authorized: AuthorizedCaller =
        AuthorizationService::authorize_edit(persistence, caller, schedule_id, "create_event")?;
    let write: EventWrite = event_write(request, persistence.capabilities())?;

    let event_id: EventId = persistence
        .create_event(schedule_id, &write, authorized.actor())
        .map_err(translate_persistence_error)?;
    load_event_info(persistence, schedule_id, event_id)
}

/// Replaces a calendar event.
///
/// # Errors
///
/// Returns the errors of [`create_event`], or `ResourceNotFound` if the
/// event does not exist.
pub fn update_event(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    event_id: i64,
    request: &EventRequest,
) -> Result<EventInfo, ApiError> {
    AuthorizationService::authorize_edit(persistence, caller, schedule_id, "update_event")?;
    let write: EventWrite = event_write(request, persistence.capabilities())?;
    let event_id: EventId = EventId::new(event_id);

    persistence
        .update_event(schedule_id, event_id, &write)
        .map_err(translate_persistence_error)?;
    load_event_info(persistence, schedule_id, event_id)
}

/// Removes a calendar event.
///
/// # Errors
///
/// Returns an error if the caller is below Maintainer or the event does
/// not exist.
pub fn delete_event(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    event_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_edit(persistence, caller, schedule_id, "delete_event")?;
    persistence
        .delete_event(schedule_id, EventId::new(event_id))
        .map_err(translate_persistence_error)?;
    Ok(())
}

/// Lists the events touching an inclusive date range.
///
/// # Errors
///
/// Returns an error if the caller is not a member, a date is malformed or
/// the range ends before it starts.
pub fn list_events(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &ListEventsRequest,
) -> Result<ListEventsResponse, ApiError> {
    AuthorizationService::authorize_read(persistence, caller, schedule_id, "list_events")?;
    let start: Date = parse_date_field("startDate", &request.start_date)?;
    let end: Date = parse_date_field("endDate", &request.end_date)?;
    if end < start {
        return Err(invalid("endDate", "End date must not be before the start date"));
    }

    let capabilities: StoreCapabilities = persistence.capabilities();
    let events: Vec<EventData> = persistence
        .events_between(schedule_id, start, end)
        .map_err(translate_persistence_error)?;
    Ok(ListEventsResponse {
        events: events
            .iter()
            .map(|data| event_info(data, capabilities))
            .collect::<Result<_, _>>()?,
    })
}

// ============================================================================
// Month View
// ============================================================================

fn month_employee_info(employee: MonthEmployee) -> MonthEmployeeInfo {
    MonthEmployeeInfo {
        user_oid: employee.user_oid.to_string(),
        name: employee.name,
        role: employee.role.as_str().to_string(),
        day_colors: employee
            .day_colors
            .into_iter()
            .map(|(day, color)| (day, color.to_string()))
            .collect::<BTreeMap<u8, String>>(),
        day_visuals: employee.day_visuals,
    }
}

fn month_group_info(group: MonthGroup) -> MonthGroupInfo {
    MonthGroupInfo {
        employee_type_id: group.employee_type_id.value(),
        category: group.category,
        employees: group.employees.into_iter().map(month_employee_info).collect(),
        day_visuals: group.day_visuals,
    }
}

fn month_event_info(event: &ScheduleEvent) -> Result<MonthEventInfo, ApiError> {
    Ok(MonthEventInfo {
        event_id: event.event_id.value(),
        scope_type: event.scope.scope_type().as_str().to_string(),
        employee_type_id: event.scope.employee_type_id().map(EmployeeTypeId::value),
        user_oid: event.scope.user_oid().map(ToString::to_string),
        start_date: date_string(event.start_date)?,
        end_date: date_string(event.end_date)?,
        display_mode: event.display_mode.label().to_string(),
        color: event.color.to_string(),
    })
}

/// Renders one calendar month.
///
/// # Errors
///
/// Returns an error if the caller is not a member, the month is out of
/// range or the store fails.
pub fn get_month(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &MonthRequest,
) -> Result<MonthResponse, ApiError> {
    AuthorizationService::authorize_read(persistence, caller, schedule_id, "get_month")?;
    let range: MonthRange =
        validate_month(request.year, request.month_index).map_err(translate_domain_error)?;

    let inputs: MonthInputs = persistence
        .load_month_inputs(schedule_id, range)
        .map_err(translate_persistence_error)?;
    let view: MonthView = build_month_view(range, &inputs, persistence.capabilities());

    let events: Vec<MonthEventInfo> = view
        .events
        .iter()
        .map(month_event_info)
        .collect::<Result<_, _>>()?;
    Ok(MonthResponse {
        year: request.year,
        month_index: request.month_index,
        month_start: date_string(view.range.start)?,
        month_end: date_string(view.range.end)?,
        groups: view.groups.into_iter().map(month_group_info).collect(),
        events,
    })
}

// ============================================================================
// Members & Capabilities
// ============================================================================

/// Lists the active members of a schedule.
///
/// # Errors
///
/// Returns an error if the caller is not a member or the store fails.
pub fn list_members(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
) -> Result<ListMembersResponse, ApiError> {
    AuthorizationService::authorize_read(persistence, caller, schedule_id, "list_members")?;
    let members: Vec<MemberData> = persistence
        .list_members(schedule_id)
        .map_err(translate_persistence_error)?;
    Ok(ListMembersResponse {
        members: members.into_iter().map(member_info).collect(),
    })
}

/// Adds a member or changes their name and role.
///
/// # Errors
///
/// Returns an error if the caller is not a Manager, the input is invalid
/// or the change would leave the schedule without a Manager.
pub fn upsert_member(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &UpsertMemberRequest,
) -> Result<MemberInfo, ApiError> {
    AuthorizationService::authorize_manage(persistence, caller, schedule_id, "upsert_member")?;
    let user_oid: UserOid = parse_user_oid(&request.user_oid)?;
    let display_name: Option<String> =
        clean_optional_text("displayName", request.display_name.as_deref(), LABEL_MAX)
            .map_err(translate_domain_error)?;
    let role: ScheduleRole = ScheduleRole::parse(&request.role).map_err(translate_domain_error)?;

    persistence
        .upsert_member(schedule_id, &user_oid, display_name.as_deref(), role)
        .map_err(translate_persistence_error)?;
    Ok(MemberInfo {
        user_oid: user_oid.to_string(),
        display_name,
        role: role.as_str().to_string(),
    })
}

/// Renames a member or changes their role.
///
/// Any member may change their own display name. Renaming someone else or
/// changing a role takes a Manager.
///
/// # Errors
///
/// Returns an error if the caller lacks the role, the input is invalid,
/// the member does not exist or the change would leave the schedule
/// without a Manager.
pub fn update_member(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &UpdateMemberRequest,
) -> Result<MemberInfo, ApiError> {
    let authorized: AuthorizedCaller =
        AuthorizationService::authorize_read(persistence, caller, schedule_id, "update_member")?;
    let user_oid: UserOid = parse_user_oid(&request.user_oid)?;
    if request.role.is_some() || user_oid != authorized.user_oid {
        AuthorizationService::check_role(authorized.role, ScheduleRole::Manager, "update_member")?;
    }

    let display_name: Option<String> = request
        .display_name
        .as_deref()
        .map(|name| validate_name("displayName", name, LABEL_MAX))
        .transpose()
        .map_err(translate_domain_error)?;
    let role: Option<ScheduleRole> = request
        .role
        .as_deref()
        .map(ScheduleRole::parse)
        .transpose()
        .map_err(translate_domain_error)?;
    if display_name.is_none() && role.is_none() {
        return Err(invalid("displayName", "Nothing to update"));
    }

    if let Some(role) = role {
        persistence
            .set_member_role(schedule_id, &user_oid, role)
            .map_err(translate_persistence_error)?;
    }
    if let Some(name) = display_name.as_deref() {
        persistence
            .set_display_name(schedule_id, &user_oid, Some(name))
            .map_err(translate_persistence_error)?;
    }

    persistence
        .get_member(schedule_id, &user_oid)
        .map_err(translate_persistence_error)?
        .map(member_info)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Member"),
            message: format!("Member {user_oid} not found"),
        })
}

/// Removes a member from a schedule.
///
/// # Errors
///
/// Returns an error if the caller is not a Manager, the member does not
/// exist or they are the last Manager.
pub fn remove_member(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
    request: &RemoveMemberRequest,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage(persistence, caller, schedule_id, "remove_member")?;
    let user_oid: UserOid = parse_user_oid(&request.user_oid)?;
    persistence
        .deactivate_member(schedule_id, &user_oid)
        .map_err(translate_persistence_error)
}

/// Returns what the caller may do in a schedule.
///
/// # Errors
///
/// Returns an error if the caller is not a member.
pub fn get_capabilities(
    persistence: &mut Persistence,
    caller: &Caller,
    schedule_id: ScheduleId,
) -> Result<ScheduleCapabilities, ApiError> {
    let authorized: AuthorizedCaller =
        AuthorizationService::authorize_read(persistence, caller, schedule_id, "get_capabilities")?;
    Ok(compute_schedule_capabilities(
        authorized.role,
        persistence.capabilities(),
    ))
}
