// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift history and assignment handlers.

use crate::{
    ApiError, AssignmentInfo, CreateShiftRequest, ListAssignmentsRequest,
    ListAssignmentsResponse, ListShiftVersionsResponse, ShiftInfo, UpdateShiftRequest,
    UpsertAssignmentRequest, UpsertAssignmentResponse, create_shift, list_assignments,
    list_shift_versions, update_shift, upsert_assignment,
};

use super::helpers::{
    MAINTAINER, MEMBER, caller, create_test_pattern, create_test_schedule, create_test_shift,
    today,
};

fn assign(user_oid: &str, employee_type_id: i64, start_date: &str) -> UpsertAssignmentRequest {
    UpsertAssignmentRequest {
        user_oid: String::from(user_oid),
        employee_type_id,
        start_date: String::from(start_date),
        display_order: None,
    }
}

// ============================================================================
// Shifts
// ============================================================================

#[test]
fn test_create_shift_appends_to_display_order() {
    let (mut persistence, schedule_id) = create_test_schedule();
    create_test_shift(&mut persistence, schedule_id, "Days", None, "2026-01-01");

    let nights: ShiftInfo =
        create_test_shift(&mut persistence, schedule_id, "Nights", None, "2026-01-01");

    assert_eq!(nights.display_order, 2);
    assert_eq!(nights.start_date, "2026-01-01");
}

#[test]
fn test_create_shift_rejects_bad_date() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let request: CreateShiftRequest = CreateShiftRequest {
        name: String::from("Days"),
        pattern_id: None,
        start_date: String::from("2026-13-01"),
        display_order: None,
    };

    let result = create_shift(&mut persistence, &caller(MAINTAINER), schedule_id, &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "startDate"
    ));
}

#[test]
fn test_create_shift_rejects_long_name() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let request: CreateShiftRequest = CreateShiftRequest {
        name: "x".repeat(51),
        pattern_id: None,
        start_date: String::from("2026-01-01"),
        display_order: None,
    };

    let result = create_shift(&mut persistence, &caller(MAINTAINER), schedule_id, &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "name"
    ));
}

#[test]
fn test_create_shift_rejects_out_of_range_position() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let request: CreateShiftRequest = CreateShiftRequest {
        name: String::from("Days"),
        pattern_id: None,
        start_date: String::from("2026-01-01"),
        display_order: Some(3),
    };

    let result = create_shift(&mut persistence, &caller(MAINTAINER), schedule_id, &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "displayOrder"
    ));
}

#[test]
fn test_future_shift_change_splits_history() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: i64 = create_test_pattern(&mut persistence, schedule_id, "Rotation");
    let days: ShiftInfo =
        create_test_shift(&mut persistence, schedule_id, "Days", None, "2026-01-01");
    let request: UpdateShiftRequest = UpdateShiftRequest {
        employee_type_id: days.employee_type_id,
        name: String::from("Days"),
        pattern_id: Some(pattern_id),
        effective_date: String::from("2026-04-01"),
        display_order: None,
    };

    let current: ShiftInfo = update_shift(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &request,
        today(),
    )
    .unwrap();

    assert_eq!(current.pattern_id, None);
    let history: ListShiftVersionsResponse = list_shift_versions(
        &mut persistence,
        &caller(MEMBER),
        schedule_id,
        days.employee_type_id,
    )
    .unwrap();
    assert_eq!(history.versions.len(), 2);
    assert_eq!(history.versions[0].end_date.as_deref(), Some("2026-03-31"));
    assert_eq!(history.versions[1].start_date, "2026-04-01");
    assert_eq!(history.versions[1].end_date, None);
    assert_eq!(history.versions[1].pattern_id, Some(pattern_id));
}

#[test]
fn test_update_shift_rejects_member() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let days: ShiftInfo =
        create_test_shift(&mut persistence, schedule_id, "Days", None, "2026-01-01");
    let request: UpdateShiftRequest = UpdateShiftRequest {
        employee_type_id: days.employee_type_id,
        name: String::from("Early"),
        pattern_id: None,
        effective_date: String::from("2026-04-01"),
        display_order: None,
    };

    let result = update_shift(
        &mut persistence,
        &caller(MEMBER),
        schedule_id,
        &request,
        today(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_list_versions_of_unknown_shift_is_not_found() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = list_shift_versions(&mut persistence, &caller(MEMBER), schedule_id, 404);

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Shift"
    ));
}

// ============================================================================
// Assignments
// ============================================================================

#[test]
fn test_assignment_move_closes_previous_shift() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let days: i64 =
        create_test_shift(&mut persistence, schedule_id, "Days", None, "2026-01-01")
            .employee_type_id;
    let nights: i64 =
        create_test_shift(&mut persistence, schedule_id, "Nights", None, "2026-01-01")
            .employee_type_id;
    upsert_assignment(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &assign(MEMBER, days, "2026-01-01"),
    )
    .unwrap();

    let response: UpsertAssignmentResponse = upsert_assignment(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &assign(MEMBER, nights, "2026-03-01"),
    )
    .unwrap();

    let timeline: &[AssignmentInfo] = &response.timeline;
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0].employee_type_id, days);
    assert_eq!(timeline[0].end_date.as_deref(), Some("2026-02-28"));
    assert_eq!(timeline[1].employee_type_id, nights);
    assert_eq!(timeline[1].end_date, None);
}

#[test]
fn test_list_assignments_defaults_to_today() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let days: i64 =
        create_test_shift(&mut persistence, schedule_id, "Days", None, "2026-01-01")
            .employee_type_id;
    let nights: i64 =
        create_test_shift(&mut persistence, schedule_id, "Nights", None, "2026-01-01")
            .employee_type_id;
    for (shift, start) in [(days, "2026-01-01"), (nights, "2026-03-01")] {
        upsert_assignment(
            &mut persistence,
            &caller(MAINTAINER),
            schedule_id,
            &assign(MEMBER, shift, start),
        )
        .unwrap();
    }

    let current: ListAssignmentsResponse = list_assignments(
        &mut persistence,
        &caller(MEMBER),
        schedule_id,
        &ListAssignmentsRequest::default(),
        today(),
    )
    .unwrap();
    let february: ListAssignmentsResponse = list_assignments(
        &mut persistence,
        &caller(MEMBER),
        schedule_id,
        &ListAssignmentsRequest {
            as_of: Some(String::from("2026-02-01")),
        },
        today(),
    )
    .unwrap();

    assert_eq!(current.as_of, "2026-03-15");
    assert_eq!(current.assignments[0].employee_type_id, nights);
    assert_eq!(february.assignments[0].employee_type_id, days);
}

#[test]
fn test_assignment_of_non_member_is_not_found() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let days: i64 =
        create_test_shift(&mut persistence, schedule_id, "Days", None, "2026-01-01")
            .employee_type_id;

    let result = upsert_assignment(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &assign("stranger", days, "2026-01-01"),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Member"
    ));
}

#[test]
fn test_assignment_rejects_blank_user() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = upsert_assignment(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &assign("  ", 1, "2026-01-01"),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "userOid"
    ));
}
